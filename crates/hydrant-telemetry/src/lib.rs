//! Structured logging and request metrics for Hydrant.
//!
//! - **Logging**: `tracing-subscriber` with JSON or pretty output and an
//!   `EnvFilter`, see [`init_logging`].
//! - **Metrics**: counters and histograms through the `metrics` facade. No
//!   exporter is bundled.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `hydrant_requests_total` | Counter | `operation`, `method`, `status` | Total request count |
//! | `hydrant_request_duration_seconds` | Histogram | `operation` | Dispatch latency |
//! | `hydrant_in_flight_requests` | Gauge | - | Requests being dispatched |
//! | `hydrant_negotiation_failures_total` | Counter | `direction` | 406 / 415 outcomes |
//! | `hydrant_response_size_bytes` | Histogram | `operation` | Response body size |
//!
//! # Example
//!
//! ```rust,ignore
//! use hydrant_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! hydrant_telemetry::metrics::describe_metrics();
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{fields, init_logging, LogConfig, LogFormat};
pub use metrics::InFlightGuard;

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
