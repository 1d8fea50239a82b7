//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → WatcherConfig (validated, immutable)
//!
//! CLI args or interactive prompt
//!     → run.rs (gas threshold, network mode, max wait)
//!     → RunConfig (immutable, built once before any provider exists)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; nothing mutates it after startup
//! - All fields have defaults to allow running without a file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod run;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use run::RunConfig;
pub use schema::{DeployConfig, RetryConfig, RpcConfig, WatcherConfig};
