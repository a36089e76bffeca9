//! Request metrics through the `metrics` facade.
//!
//! No exporter is installed here; without a recorder every call is a no-op.
//! Applications install the recorder of their choice and may call
//! [`describe_metrics`] once to register help texts.

use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};

/// Counter of handled requests.
pub const REQUESTS_TOTAL: &str = "hydrant_requests_total";

/// Histogram of request durations.
pub const REQUEST_DURATION_SECONDS: &str = "hydrant_request_duration_seconds";

/// Gauge of requests being dispatched.
pub const IN_FLIGHT_REQUESTS: &str = "hydrant_in_flight_requests";

/// Counter of failed content negotiations.
pub const NEGOTIATION_FAILURES_TOTAL: &str = "hydrant_negotiation_failures_total";

/// Histogram of response body sizes.
pub const RESPONSE_SIZE_BYTES: &str = "hydrant_response_size_bytes";

/// Registers descriptions for all standard metrics.
pub fn describe_metrics() {
    describe_counter!(REQUESTS_TOTAL, "Total number of requests dispatched");
    describe_histogram!(REQUEST_DURATION_SECONDS, "Request dispatch duration in seconds");
    describe_gauge!(IN_FLIGHT_REQUESTS, "Number of requests currently being dispatched");
    describe_counter!(
        NEGOTIATION_FAILURES_TOTAL,
        "Requests rejected with 406 or 415 by content negotiation"
    );
    describe_histogram!(RESPONSE_SIZE_BYTES, "Response body size in bytes");
}

/// Records a completed request.
///
/// `operation` is `Controller.method`, or `unmatched` when no operation
/// was selected.
pub fn record_request(operation: &str, method: &str, status_code: u16, duration: Duration) {
    counter!(
        REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "method" => method.to_string(),
        "status" => status_code.to_string()
    )
    .increment(1);

    histogram!(
        REQUEST_DURATION_SECONDS,
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Records a negotiation failure; `direction` is `inbound` or `outbound`.
pub fn record_negotiation_failure(direction: &str) {
    counter!(NEGOTIATION_FAILURES_TOTAL, "direction" => direction.to_string()).increment(1);
}

/// Records response body size.
pub fn record_response_size(operation: &str, size_bytes: u64) {
    histogram!(
        RESPONSE_SIZE_BYTES,
        "operation" => operation.to_string()
    )
    .record(size_bytes as f64);
}

/// Guard that decrements in-flight requests on drop.
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Creates a new guard and increments the in-flight gauge.
    #[must_use]
    pub fn new() -> Self {
        gauge!(IN_FLIGHT_REQUESTS).increment(1.0);
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!(IN_FLIGHT_REQUESTS).decrement(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert_eq!(REQUESTS_TOTAL, "hydrant_requests_total");
        assert_eq!(REQUEST_DURATION_SECONDS, "hydrant_request_duration_seconds");
    }

    #[test]
    fn test_record_functions_dont_panic() {
        // Without a recorder the facade discards everything.
        describe_metrics();
        record_request("Product.list", "GET", 200, Duration::from_millis(10));
        record_negotiation_failure("outbound");
        record_response_size("Product.list", 2048);
    }

    #[test]
    fn test_in_flight_guard() {
        let guard = InFlightGuard::new();
        drop(guard);
    }
}
