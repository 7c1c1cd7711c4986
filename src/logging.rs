//! Structured logging initialisation (component A2).
//!
//! Unlike the teacher's multi-threaded executor, this simulator is strictly single-threaded and
//! cooperative, so per-event thread ids add no diagnostic value here and are dropped. The default
//! filter (used only when `RUST_LOG` is unset) also scopes to this crate's own targets rather than
//! a bare global level, since a backtest run has no interest in dependency-crate log noise.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn default_filter(log_level: &str) -> String {
    format!("backtest_core={log_level}")
}

pub fn init_logger(log_level: &str, json_logs: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)));

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_scopes_to_crate_target() {
        assert_eq!(default_filter("debug"), "backtest_core=debug");
    }
}
