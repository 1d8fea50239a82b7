//! Shutdown coordination between the run loop and the block watcher.

use tokio::sync::broadcast;

/// One-shot stop signal for background tasks.
///
/// The run loop owns it and fires it once a deploy has finished, the wait
/// deadline passed, or the loop failed. Dropping it has the same effect.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe before spawning a task so the signal cannot be missed.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        // No receivers means every task has already stopped.
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
