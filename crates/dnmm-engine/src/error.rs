//! Engine error types.

use dnmm_core::CoreError;
use dnmm_exchange::ExchangeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    #[error("Reconnect attempts exhausted after {attempts}")]
    ReconnectExhausted { attempts: u32 },
}

pub type EngineResult<T> = Result<T, EngineError>;
