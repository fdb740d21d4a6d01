//! Structured logging.
//!
//! `RUST_LOG` takes precedence; otherwise the configured level applies to
//! datamgr and tower_http.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
pub fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level).into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_filter(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    format!("datamgr={level},tower_http={level}")
}
