//! Observability: request metrics, process gauges, and the access log.
//!
//! Metrics are stored as atomics and rendered by the `/metrics` handler in the
//! Prometheus text format. The access log is a plain file, separate from
//! `tracing` output.

pub mod access_log;
pub mod metrics;
pub mod middleware;
pub mod process;

pub use access_log::AccessLog;
pub use metrics::ServiceMetrics;
pub use process::ProcessInfo;
