//! Structured logging.
//!
//! `RUST_LOG` takes precedence. Without it the crate logs at `info`, or at
//! `debug` when the settings document sets `DEBUG`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "table_viewer=debug,tower_http=debug"
    } else {
        "table_viewer=info,tower_http=info"
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(debug).into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
