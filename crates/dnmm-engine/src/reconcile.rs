//! Order reconciler: cancel-then-replace.
//!
//! Each cycle re-queries the open orders (no local cache is trusted),
//! cancels them all, then submits the new target ladders as GTC limit
//! orders. Cancels are issued concurrently and fully awaited before
//! any submission starts; the exchange may reject or miss individual
//! orders between query and cancel, so every call is best-effort and
//! per-order failures never abort the batch.

use dnmm_core::{OrderSide, Price, Size, TimeInForce};
use dnmm_exchange::{ExchangeClient, ExchangeError};
use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::ladder::Ladder;

/// Per-order cancel outcome.
#[derive(Debug)]
pub struct CancelOutcome {
    pub order_id: u64,
    pub result: Result<(), ExchangeError>,
}

/// Per-order submission outcome. `result` carries the exchange order
/// id on success.
#[derive(Debug)]
pub struct SubmitOutcome {
    pub side: OrderSide,
    pub price: Price,
    pub size: Size,
    pub result: Result<u64, ExchangeError>,
}

/// Everything that happened in one reconciliation pass.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Open-orders query failed; cancels and submissions were skipped
    /// to avoid stacking duplicate quotes on unknown state.
    pub query_error: Option<ExchangeError>,
    pub cancels: Vec<CancelOutcome>,
    pub submits: Vec<SubmitOutcome>,
}

impl ReconcileReport {
    pub fn cancelled(&self) -> usize {
        self.cancels.iter().filter(|c| c.result.is_ok()).count()
    }

    pub fn cancel_failures(&self) -> usize {
        self.cancels.len() - self.cancelled()
    }

    pub fn submitted(&self) -> usize {
        self.submits.iter().filter(|s| s.result.is_ok()).count()
    }

    pub fn submit_failures(&self) -> usize {
        self.submits.len() - self.submitted()
    }
}

/// Run one cancel-then-replace pass.
pub async fn reconcile(
    client: &dyn ExchangeClient,
    symbol: &str,
    bids: &Ladder,
    asks: &Ladder,
    tif: TimeInForce,
) -> ReconcileReport {
    // An empty book is the common steady state, not an error.
    let open = match client.open_orders(symbol).await {
        Ok(open) => open,
        Err(e) => {
            warn!(error = %e, "open-orders query failed, skipping reconciliation");
            return ReconcileReport {
                query_error: Some(e),
                ..ReconcileReport::default()
            };
        }
    };

    // Cancellation batch: all concurrent, all awaited before any
    // submission is issued.
    let cancels = join_all(open.iter().map(|order| async move {
        let result = client
            .cancel_order(symbol, order.order_id)
            .await
            .map(|_| ());
        if let Err(e) = &result {
            warn!(order_id = order.order_id, error = %e, "cancel failed");
        }
        CancelOutcome {
            order_id: order.order_id,
            result,
        }
    }))
    .await;

    // Submission batch: one GTC limit order per ladder entry.
    let targets = bids
        .iter()
        .map(|(price, size)| (OrderSide::Buy, *price, *size))
        .chain(
            asks.iter()
                .map(|(price, size)| (OrderSide::Sell, *price, *size)),
        );

    let submits = join_all(targets.map(|(side, price, size)| async move {
        let result = client
            .place_limit_order(symbol, side, price, size, tif)
            .await
            .map(|r| r.order_id);
        match &result {
            Ok(order_id) => debug!(order_id, %side, %price, %size, "quote placed"),
            Err(e) => warn!(%side, %price, %size, error = %e, "quote submission failed"),
        }
        SubmitOutcome {
            side,
            price,
            size,
            result,
        }
    }))
    .await;

    ReconcileReport {
        query_error: None,
        cancels,
        submits,
    }
}
