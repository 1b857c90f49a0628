//! Core domain types for the delta-neutral market maker.
//!
//! This crate provides fundamental types used throughout the system:
//! - `Price`, `Size`: Precision-safe numeric types
//! - `DepthLevel`, `DepthSnapshot`: Order-book depth data
//! - `OrderSide`, `TimeInForce`: Trading enums

pub mod decimal;
pub mod depth;
pub mod error;
pub mod order;

pub use decimal::{Price, Size};
pub use depth::{DepthLevel, DepthSnapshot, RawDepthFrame};
pub use error::{CoreError, CoreResult};
pub use order::{ClientOrderId, OrderSide, TimeInForce};
