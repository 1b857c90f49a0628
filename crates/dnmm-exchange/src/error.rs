//! Exchange boundary error types.

use thiserror::Error;

/// Errors surfaced by the exchange capability interface.
///
/// `Request` failures are scoped to a single order call and are
/// recovered locally by the caller. The remaining variants are
/// connectivity failures: the stream or transport is gone and the
/// caller must resubscribe or give up.
#[derive(Debug, Clone, Error)]
pub enum ExchangeError {
    #[error("Order request failed: {0}")]
    Request(String),

    #[error("Connectivity failure: {0}")]
    Connectivity(String),

    #[error("Depth stream closed")]
    StreamClosed,

    #[error("Timed out after {0}ms")]
    Timeout(u64),
}

impl ExchangeError {
    /// True when the failure is scoped to a single request and the
    /// cycle can continue.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}

pub type ExchangeResult<T> = Result<T, ExchangeError>;
