//! Tracing setup for the bot binary.
//!
//! Default filtering is `info` globally with `debug` for the dnmm
//! crates; override with `RUST_LOG`. The output format switches on
//! `RUST_ENV`: flattened JSON lines when `production`, compact
//! single-line text otherwise.

use crate::error::AppResult;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVES: &str = "info,dnmm_engine=debug,dnmm_exchange=debug,dnmm_bot=debug";

pub fn init_logging() -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let json_output = std::env::var("RUST_ENV").is_ok_and(|v| v == "production");

    if json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().flatten_event(true).with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(true))
            .init();
    }

    Ok(())
}
