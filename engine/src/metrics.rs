//! Metric names emitted by the order list.
//!
//! Values are recorded through the `metrics` facade and go nowhere until a
//! recorder is installed (see `orderlist_runtime::metrics::PrometheusRecorder`).

use ::metrics::describe_counter;

/// Loads that reached the data source
pub const LOADS_TOTAL: &str = "orderlist.loads.total";
/// Loads whose source returned an error
pub const LOADS_FAILED: &str = "orderlist.loads.failed";
/// Load results discarded because a newer load had started
pub const LOADS_STALE: &str = "orderlist.loads.stale";
/// Records skipped during parsing
pub const RECORDS_REJECTED: &str = "orderlist.records.rejected";

/// Register descriptions for the order list metrics
pub fn describe() {
    describe_counter!(LOADS_TOTAL, "Order loads that reached the data source");
    describe_counter!(LOADS_FAILED, "Order loads that failed");
    describe_counter!(
        LOADS_STALE,
        "Load results discarded because a newer load superseded them"
    );
    describe_counter!(RECORDS_REJECTED, "Order records skipped as malformed");
}
