//! Run state machine.
//!
//! ```text
//! Watching --[gas < limit]--> Triggered --[deploy returns]--> Done
//! ```
//!
//! There is no way back to `Watching`. The cell is shared between the gate
//! and the block watcher; the watcher stops forwarding once it leaves
//! `Watching`.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Lifecycle of a single watcher run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RunState {
    Watching = 0,
    Triggered = 1,
    Done = 2,
}

impl RunState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Watching,
            1 => Self::Triggered,
            _ => Self::Done,
        }
    }
}

/// Shared, atomically updated [`RunState`].
#[derive(Debug, Clone)]
pub struct RunStateCell {
    inner: Arc<AtomicU8>,
}

impl RunStateCell {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AtomicU8::new(RunState::Watching as u8)),
        }
    }

    pub fn get(&self) -> RunState {
        RunState::from_u8(self.inner.load(Ordering::Acquire))
    }

    pub fn is_watching(&self) -> bool {
        self.get() == RunState::Watching
    }

    /// Watching → Triggered. Returns true for exactly one caller per run.
    pub fn try_trigger(&self) -> bool {
        self.inner
            .compare_exchange(
                RunState::Watching as u8,
                RunState::Triggered as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Triggered → Done. Returns false if the run was not triggered.
    pub fn finish(&self) -> bool {
        self.inner
            .compare_exchange(
                RunState::Triggered as u8,
                RunState::Done as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

impl Default for RunStateCell {
    fn default() -> Self {
        Self::new()
    }
}
