//! Delta-neutral market-making engine.
//!
//! One cycle per depth update: rebuild the margin-skewed quote
//! ladders, cancel-then-replace the resting orders, and hedge the
//! residual spot inventory on futures, with reconciliation and
//! hedging fanned out concurrently inside the cycle.

pub mod config;
pub mod engine;
pub mod error;
pub mod hedge;
pub mod ladder;
pub mod reconcile;

pub use config::EngineConfig;
pub use engine::{CycleStats, Engine};
pub use error::{EngineError, EngineResult};
pub use hedge::{compute_hedge, run_hedge, HedgeDecision, HedgeReport, InventoryState};
pub use ladder::{build_ladders, Ladder};
pub use reconcile::{reconcile, CancelOutcome, ReconcileReport, SubmitOutcome};
