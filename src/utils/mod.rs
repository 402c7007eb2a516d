//! # Utility Modules
//!
//! ## Components
//! - **Logging**: Subscriber setup driven by [`LoggingConfig`](crate::config::LoggingConfig)
//! - **Metrics**: Thread-safe draft counters and an operation timer

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::{DraftMetrics, MetricsSnapshot, Timer};
