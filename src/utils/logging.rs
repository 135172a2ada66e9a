//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for the chatcart application.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration. The returned guard must stay
/// alive for the lifetime of the process or file logging stops.
pub fn init_logging(config: &LoggingConfig) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "chatcart.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log dialog transitions with structured data
pub fn log_dialog_transition(user_id: &str, from: &str, to: &str) {
    info!(
        user_id = user_id,
        from = from,
        to = to,
        "Dialog transition"
    );
}

/// Log admin actions
pub fn log_admin_action(admin_id: &str, action: &str, target: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        "Admin action performed"
    );
}

/// Log balance mutations
pub fn log_balance_change(user_id: &str, amount: f64, kind: &str, reference: Option<&str>) {
    info!(
        user_id = user_id,
        amount = amount,
        kind = kind,
        reference = reference,
        "Balance changed"
    );
}
