//! deploy-under-gas
//!
//! Waits for the network gas price to drop below a limit, then runs the
//! project's deploy command exactly once.
//!
//! # Architecture Overview
//!
//! ```text
//!   argv / stdin prompt / .env / TOML
//!          │
//!          ▼
//!   ┌─────────────┐      ┌──────────────────┐
//!   │  startup    │─────▶│ blockchain       │  HTTP client (+ failover)
//!   │  prepare    │      │ connect          │  websocket or polling blocks
//!   └─────────────┘      └────────┬─────────┘
//!                                 │ BlockNotification
//!                                 ▼
//!   ┌─────────────┐      ┌──────────────────┐      ┌──────────────┐
//!   │  watcher    │─────▶│ gate             │─────▶│ deploy       │
//!   │  (task)     │ mpsc │ check_gas        │ once │ child process│
//!   └─────────────┘      └──────────────────┘      └──────────────┘
//!
//!   Cross-cutting: observability (logs, metrics, status line),
//!                  resilience (backoff, retries), lifecycle (shutdown)
//! ```
//!
//! # Exit Codes
//! - deploy command's own code (0 on success)
//! - 1: invalid gas limit or configuration
//! - 3: provider unreachable after retries
//! - 124: maximum wait elapsed
//! - 125: deploy task aborted (panicked or cancelled) before reporting a status
//! - 127: deploy command could not be started

use std::io;
use std::process::ExitCode;

use clap::Parser;

use deploy_under_gas::cli::Cli;
use deploy_under_gas::lifecycle::{connect, launch, prepare};
use deploy_under_gas::observability::{logging, metrics, StatusLine};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let startup = match prepare(&cli, io::stdin().lock(), io::stdout()) {
        Ok(startup) => startup,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(e.exit_code());
        }
    };

    logging::init_logging(&startup.watcher.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "deploy-under-gas starting");

    let observability = &startup.watcher.observability;
    if observability.metrics_enabled {
        match observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let mut status = StatusLine::stdout();
    match launch(startup, connect, &mut status).await {
        Ok(outcome) => {
            tracing::info!(?outcome, "Run finished");
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
