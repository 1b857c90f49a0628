//! Exchange capability boundary.
//!
//! Defines the traits the engine consumes (`ExchangeClient`,
//! `DepthStream`), the result types those traits speak, and an
//! in-process paper exchange (`SimExchange`) with failure injection
//! for tests and paper trading.

pub mod client;
pub mod error;
pub mod sim;
pub mod types;

pub use client::{BoxFuture, DepthStream, DynExchangeClient, ExchangeClient};
pub use error::{ExchangeError, ExchangeResult};
pub use sim::{SimCall, SimDepthHandle, SimExchange};
pub use types::{CancelResult, OrderResult, OrderStatus, OutstandingOrder};
