//! Cycle orchestrator.
//!
//! Drives one iteration per depth frame: receive (bounded wait),
//! rebuild ladders, then run reconciliation and hedging concurrently
//! and join both before the next receive. Cycles are strictly
//! sequential. The subscription is wrapped in retry-with-backoff; a
//! cancellation token stops the loop at the receive suspension point.

use std::time::Duration;

use dnmm_core::{RawDepthFrame, TimeInForce};
use dnmm_exchange::{DepthStream, DynExchangeClient, ExchangeError};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::hedge::{run_hedge, HedgeDecision};
use crate::ladder::build_ladders;
use crate::reconcile::reconcile;

/// Summary of one completed cycle.
#[derive(Debug)]
pub struct CycleStats {
    pub cancelled: usize,
    pub cancel_failures: usize,
    pub submitted: usize,
    pub submit_failures: usize,
    pub hedge: HedgeDecision,
}

/// Why the current stream stopped yielding frames.
///
/// Every non-shutdown ending is folded into an `ExchangeError` so the
/// resubscription path logs one uniform cause.
#[derive(Debug)]
enum StreamEnd {
    Shutdown,
    Lost(ExchangeError),
}

pub struct Engine {
    config: EngineConfig,
    client: DynExchangeClient,
    shutdown: CancellationToken,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        client: DynExchangeClient,
        shutdown: CancellationToken,
    ) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            client,
            shutdown,
        })
    }

    /// Run until the token is cancelled or reconnection gives up.
    pub async fn run(&self) -> EngineResult<()> {
        info!(
            symbol = %self.config.symbol,
            margin_bps = %self.config.margin_bps,
            levels = self.config.depth_levels,
            "engine starting"
        );

        loop {
            if self.shutdown.is_cancelled() {
                info!("shutdown requested, engine terminated");
                return Ok(());
            }

            let Some(mut stream) = self.subscribe_with_retry().await? else {
                info!("shutdown requested during backoff, engine terminated");
                return Ok(());
            };

            match self.run_stream(stream.as_mut()).await {
                StreamEnd::Shutdown => {
                    info!("shutdown requested, engine terminated");
                    return Ok(());
                }
                StreamEnd::Lost(e) => warn!(error = %e, "depth stream lost, resubscribing"),
            }
        }
    }

    /// Subscribe with exponential backoff.
    ///
    /// `Ok(None)` means shutdown arrived while waiting to retry.
    async fn subscribe_with_retry(&self) -> EngineResult<Option<Box<dyn DepthStream>>> {
        let mut attempt = 0u32;

        loop {
            match self
                .client
                .subscribe_depth(&self.config.symbol, self.config.depth_levels)
                .await
            {
                Ok(stream) => {
                    info!(symbol = %self.config.symbol, "depth subscription established");
                    return Ok(Some(stream));
                }
                Err(e) => {
                    error!(error = %e, "depth subscription failed");
                }
            }

            attempt += 1;
            if self.config.max_reconnect_attempts > 0
                && attempt >= self.config.max_reconnect_attempts
            {
                error!(attempt, "max reconnection attempts reached");
                return Err(EngineError::ReconnectExhausted { attempts: attempt });
            }

            let delay = self.backoff_delay(attempt);
            warn!(attempt, delay_ms = delay.as_millis(), "retrying subscription");

            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = self.shutdown.cancelled() => return Ok(None),
            }
        }
    }

    /// Consume frames from one subscription until it ends.
    async fn run_stream(&self, stream: &mut dyn DepthStream) -> StreamEnd {
        let mut cycle = 0u64;
        let recv_timeout = Duration::from_millis(self.config.recv_timeout_ms);

        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => return StreamEnd::Shutdown,

                received = tokio::time::timeout(recv_timeout, stream.recv()) => {
                    let frame = match received {
                        Err(_) => {
                            return StreamEnd::Lost(ExchangeError::Timeout(
                                self.config.recv_timeout_ms,
                            ))
                        }
                        Ok(Ok(Some(frame))) => frame,
                        Ok(Ok(None)) => return StreamEnd::Lost(ExchangeError::StreamClosed),
                        Ok(Err(e)) => return StreamEnd::Lost(e),
                    };

                    cycle += 1;
                    if let Some(stats) = self.run_cycle(&frame).await {
                        info!(
                            cycle,
                            cancelled = stats.cancelled,
                            cancel_failures = stats.cancel_failures,
                            submitted = stats.submitted,
                            submit_failures = stats.submit_failures,
                            hedge = ?stats.hedge,
                            "cycle complete"
                        );
                    }
                }
            }
        }
    }

    /// One full cycle for one frame.
    ///
    /// Returns `None` when the frame fails validation; the cycle is
    /// skipped and the loop waits for the next frame. A cycle counts
    /// as successful once all intended requests are issued, whatever
    /// the individual outcomes.
    pub async fn run_cycle(&self, frame: &RawDepthFrame) -> Option<CycleStats> {
        let snapshot = match dnmm_core::DepthSnapshot::from_raw(frame, self.config.depth_levels) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "malformed depth frame, skipping cycle");
                return None;
            }
        };

        let (bids, asks) = build_ladders(&snapshot, self.config.margin(), self.config.price_decimals);

        // Reconciliation (cancel-then-replace, strictly ordered inside)
        // and hedging touch independent resources; fan out and join.
        let (reconcile_report, hedge_report) = tokio::join!(
            reconcile(
                self.client.as_ref(),
                &self.config.symbol,
                &bids,
                &asks,
                TimeInForce::GoodTilCancelled,
            ),
            run_hedge(self.client.as_ref(), &self.config),
        );

        Some(CycleStats {
            cancelled: reconcile_report.cancelled(),
            cancel_failures: reconcile_report.cancel_failures(),
            submitted: reconcile_report.submitted(),
            submit_failures: reconcile_report.submit_failures(),
            hedge: hedge_report.decision,
        })
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        let base = self.config.reconnect_base_delay_ms;
        let max = self.config.reconnect_max_delay_ms;

        // base * 2^(attempt-1), capped, plus 0-1000ms jitter
        let exponent = attempt.saturating_sub(1).min(10);
        let delay = base.saturating_mul(1u64 << exponent).min(max);
        Duration::from_millis(delay + rand_jitter())
    }
}

/// Generate random jitter (0-1000ms).
fn rand_jitter() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    (nanos % 1000) as u64
}
