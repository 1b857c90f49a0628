//! Exchange capability traits.
//!
//! The connectivity layer (sockets, REST, signing) lives outside this
//! repo; the engine consumes it through these traits. This allows:
//! - Dependency injection for testing
//! - Paper trading against the in-process simulator
//! - Future flexibility in transport implementation

use std::pin::Pin;
use std::sync::Arc;

use dnmm_core::{OrderSide, Price, RawDepthFrame, Size, TimeInForce};
use rust_decimal::Decimal;

use crate::error::ExchangeResult;
use crate::types::{CancelResult, OrderResult, OutstandingOrder};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Async sequence of depth frames for one instrument.
///
/// `Ok(None)` means the stream closed normally; an error means the
/// transport failed and the caller should resubscribe.
pub trait DepthStream: Send {
    fn recv(&mut self) -> BoxFuture<'_, ExchangeResult<Option<RawDepthFrame>>>;
}

/// Capability interface to the exchange account.
///
/// One implementation per venue plus the in-process simulator. All
/// methods are independent suspension points; the engine fans calls
/// out concurrently and joins them per cycle.
pub trait ExchangeClient: Send + Sync {
    /// Place a resting limit order on the spot book.
    fn place_limit_order(
        &self,
        symbol: &str,
        side: OrderSide,
        price: Price,
        size: Size,
        tif: TimeInForce,
    ) -> BoxFuture<'_, ExchangeResult<OrderResult>>;

    /// Place a market order on the futures instrument.
    fn place_market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        size: Size,
    ) -> BoxFuture<'_, ExchangeResult<OrderResult>>;

    /// Query all currently open orders for the instrument.
    fn open_orders(&self, symbol: &str) -> BoxFuture<'_, ExchangeResult<Vec<OutstandingOrder>>>;

    /// Cancel one resting order by exchange order id.
    fn cancel_order(
        &self,
        symbol: &str,
        order_id: u64,
    ) -> BoxFuture<'_, ExchangeResult<CancelResult>>;

    /// Free spot balance of the base asset.
    fn spot_balance(&self, asset: &str) -> BoxFuture<'_, ExchangeResult<Decimal>>;

    /// Signed futures position amount (positive = long).
    fn futures_position(&self, symbol: &str) -> BoxFuture<'_, ExchangeResult<Decimal>>;

    /// Subscribe to depth updates, `levels` per side.
    fn subscribe_depth(
        &self,
        symbol: &str,
        levels: usize,
    ) -> BoxFuture<'_, ExchangeResult<Box<dyn DepthStream>>>;
}

/// Arc wrapper for ExchangeClient trait objects.
pub type DynExchangeClient = Arc<dyn ExchangeClient>;
