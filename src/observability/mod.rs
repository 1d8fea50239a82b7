//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, stderr)
//!     → metrics.rs (counters, gauges; Prometheus when enabled)
//!
//! Run loop produces:
//!     → status.rs (live single-line gas price display, stdout)
//! ```
//!
//! # Design Decisions
//! - Structured fields (gwei, block, network, code) on every event
//! - Metrics are cheap no-ops unless the exporter is installed

pub mod logging;
pub mod metrics;
pub mod status;

pub use status::StatusLine;
