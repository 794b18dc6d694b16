//! Observability subsystem: structured logging and metrics.

pub mod logging;
pub mod metrics;
