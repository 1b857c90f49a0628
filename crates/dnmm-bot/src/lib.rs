//! Delta-neutral market maker application.

pub mod app;
pub mod config;
pub mod error;
pub mod feed;
pub mod logging;

pub use app::Application;
pub use config::{AppConfig, SimConfig};
pub use error::{AppError, AppResult};
pub use logging::init_logging;
