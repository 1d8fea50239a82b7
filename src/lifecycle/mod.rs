//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     CLI/env → Load config → Validate → Resolve limit + network → Connect
//!
//! Run (run.rs):
//!     BlockWatcher task → channel → GasGate::check_gas → RunOutcome
//!
//! Shutdown (shutdown.rs):
//!     Deploy finished / deadline / error → stop the block watcher
//! ```
//!
//! # Design Decisions
//! - Ordered startup: nothing touches the network until the limit is valid
//! - The run loop owns the shutdown signal and always joins the watcher

pub mod run;
pub mod shutdown;
pub mod startup;

pub use run::{launch, watch_and_deploy, RunOutcome};
pub use shutdown::Shutdown;
pub use startup::{connect, prepare, Components, Startup};
