//! Gas-price-gated deploy trigger library

pub mod blockchain;
pub mod cli;
pub mod config;
pub mod deploy;
pub mod error;
pub mod gate;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod watcher;

pub use cli::Cli;
pub use config::schema::WatcherConfig;
pub use error::RunError;
pub use lifecycle::{launch, RunOutcome};
