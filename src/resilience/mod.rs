//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Provider call (gas price fetch, block subscription):
//!     → On failure: retries.rs (retry with backoff, bounded attempts)
//!     → backoff.rs (exponential delay, capped, with jitter)
//!     → Exhausted: error surfaces as a fatal provider error
//! ```
//!
//! # Design Decisions
//! - Read-only provider calls are retried; deployments never are
//! - Bounded attempts: a dead endpoint ends the run instead of spinning forever

pub mod backoff;
pub mod retries;

pub use backoff::Backoff;
pub use retries::retry_with_backoff;
