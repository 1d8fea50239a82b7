//! Gas gate subsystem.
//!
//! # Data Flow
//! ```text
//! BlockNotification
//!     → gas_gate.rs (fetch price with retries, compare to threshold)
//!     → state.rs (Watching → Triggered, at most once)
//!     → deploy::Deployer (blocking, on the blocking pool)
//!     → state.rs (Triggered → Done)
//! ```

pub mod gas_gate;
pub mod state;
pub mod types;

pub use gas_gate::GasGate;
pub use state::{RunState, RunStateCell};
pub use types::{GasThreshold, GateDecision, GateError, ThresholdError};
