//! Block watcher subsystem.
//!
//! # Data Flow
//! ```text
//! BlockSource::subscribe()
//!     → block_watcher.rs (forward each notification, resubscribe with backoff)
//!     → mpsc channel
//!     → lifecycle::run (one gas check per notification)
//! ```
//!
//! # Design Decisions
//! - No deduplication or batching; every notification is forwarded
//! - Forwarding stops as soon as the run leaves `Watching`
//! - The watcher owns the subscription; nothing else touches it

pub mod block_watcher;

pub use block_watcher::BlockWatcher;
