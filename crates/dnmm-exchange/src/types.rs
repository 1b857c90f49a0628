//! Exchange-facing order and account types.

use dnmm_core::{ClientOrderId, OrderSide, Price, Size};

/// An order currently resting on the exchange, as reported by an
/// open-orders query.
///
/// The exchange owns these; the engine only observes them via query
/// and removes them via cancellation. No local copy is authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutstandingOrder {
    pub order_id: u64,
    pub side: OrderSide,
    pub price: Price,
    pub size: Size,
}

/// Terminal-or-acknowledged status of a submitted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    /// Accepted and resting (limit) or queued for execution (market).
    Accepted,
    /// Fully executed.
    Filled,
    /// Rejected by the exchange.
    Rejected,
}

/// Acknowledgement of a placed order.
#[derive(Debug, Clone)]
pub struct OrderResult {
    pub order_id: u64,
    pub client_order_id: ClientOrderId,
    pub side: OrderSide,
    pub price: Option<Price>,
    pub size: Size,
    pub status: OrderStatus,
}

/// Acknowledgement of a cancel request.
#[derive(Debug, Clone)]
pub struct CancelResult {
    pub order_id: u64,
}
