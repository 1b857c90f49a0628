//! Application wiring.

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::feed::run_mock_feed;
use dnmm_engine::Engine;
use dnmm_exchange::SimExchange;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Wires the paper exchange, the mock depth feed, and the engine
/// together, and tears everything down on ctrl-c.
pub struct Application {
    config: AppConfig,
    shutdown: CancellationToken,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            shutdown: CancellationToken::new(),
        }
    }

    pub async fn run(self) -> AppResult<()> {
        let sim = SimExchange::new(
            self.config.sim.spot_balance,
            self.config.sim.futures_position,
        );
        info!(
            spot = %sim.spot_balance_now(),
            futures = %sim.futures_position_now(),
            "paper exchange seeded"
        );

        let feed = tokio::spawn(run_mock_feed(
            sim.depth_handle(),
            self.config.sim.clone(),
            self.shutdown.child_token(),
        ));

        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("ctrl-c received, shutting down");
                shutdown.cancel();
            }
        });

        let engine = Engine::new(
            self.config.engine.clone(),
            Arc::new(sim.clone()),
            self.shutdown.clone(),
        )?;

        let result = engine.run().await;
        self.shutdown.cancel();
        if let Err(e) = &result {
            error!(error = %e, "engine terminated abnormally");
        }
        let _ = feed.await;

        info!(
            spot = %sim.spot_balance_now(),
            futures = %sim.futures_position_now(),
            open_orders = sim.open_order_count(),
            "final paper account state"
        );

        result.map_err(Into::into)
    }
}
