use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::debug;

use crate::model::directory::DirectorySnapshot;

/// Buffer for snapshots not yet read by a slow subscriber. Snapshots are
/// complete, so a lagging reader only needs the newest one.
pub(crate) const DIRECTORY_CHANNEL_CAPACITY: usize = 16;

/// Cancellable, unbounded feed of directory snapshots.
///
/// Iterating blocks until the next snapshot and ends when the store goes
/// away. `try_next` never blocks, for event loops. Dropping the
/// subscription (or calling `cancel`) unsubscribes.
pub struct DirectorySubscription {
    pending: Option<DirectorySnapshot>,
    rx: broadcast::Receiver<DirectorySnapshot>,
}

impl DirectorySubscription {
    pub(crate) fn new(current: DirectorySnapshot, rx: broadcast::Receiver<DirectorySnapshot>) -> Self {
        Self {
            pending: Some(current),
            rx,
        }
    }

    pub fn try_next(&mut self) -> Option<DirectorySnapshot> {
        if let Some(snapshot) = self.pending.take() {
            return Some(snapshot);
        }
        loop {
            match self.rx.try_recv() {
                Ok(snapshot) => return Some(snapshot),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "directory subscriber lagged");
                    continue;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Drains everything buffered and returns only the newest snapshot.
    pub fn latest(&mut self) -> Option<DirectorySnapshot> {
        let mut last = None;
        while let Some(snapshot) = self.try_next() {
            last = Some(snapshot);
        }
        last
    }

    pub fn cancel(self) {
        debug!("directory subscription cancelled");
    }
}

impl Iterator for DirectorySubscription {
    type Item = DirectorySnapshot;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(snapshot) = self.pending.take() {
            return Some(snapshot);
        }
        loop {
            match self.rx.blocking_recv() {
                Ok(snapshot) => return Some(snapshot),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "directory subscriber lagged");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
