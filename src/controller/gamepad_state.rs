use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use super::axis::AxisSnapshot;

/// Holds the most recent [`AxisSnapshot`] behind a wholesale swap.
///
/// Publication replaces the whole `Arc`, so a reader gets either the old or
/// the new snapshot in full. The backing watch channel also lets consumers
/// wait for the next publication.
#[derive(Debug)]
pub struct GamepadStateHolder {
    state_sender: watch::Sender<Option<Arc<AxisSnapshot>>>,
}

impl Default for GamepadStateHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl GamepadStateHolder {
    pub fn new() -> Self {
        let (state_sender, _) = watch::channel(None);
        Self { state_sender }
    }

    /// Swaps in a fully built snapshot.
    pub fn publish(&self, snapshot: AxisSnapshot) {
        self.state_sender.send_replace(Some(Arc::new(snapshot)));
    }

    /// Most recently published snapshot, or `None` if absent.
    pub fn read(&self) -> Option<Arc<AxisSnapshot>> {
        self.state_sender.borrow().clone()
    }

    /// Marks the state absent.
    pub fn clear(&self) {
        debug!("Clearing gamepad state");
        self.state_sender.send_replace(None);
    }

    /// Receiver that is notified on every publication or clear.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<AxisSnapshot>>> {
        self.state_sender.subscribe()
    }
}
