// ── Collection subscriptions ──
//
// Lets a consumer hold one collection's latest contents and wake up when
// a fetch or mutation changes it.

use std::sync::Arc;

use tokio::sync::watch;

type Snapshot<T> = Arc<Vec<Arc<T>>>;

/// A subscription to one entity collection.
///
/// `current()` is the contents as of the last `changed()`; `latest()`
/// peeks at whatever the store holds right now.
pub struct EntityStream<T: Clone + Send + Sync + 'static> {
    current: Snapshot<T>,
    receiver: watch::Receiver<Snapshot<T>>,
}

impl<T: Clone + Send + Sync + 'static> EntityStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<Snapshot<T>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    pub fn current(&self) -> &Snapshot<T> {
        &self.current
    }

    pub fn latest(&self) -> Snapshot<T> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change and return the new contents, or `None`
    /// once the store is gone.
    pub async fn changed(&mut self) -> Option<Snapshot<T>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = Arc::clone(&snap);
        Some(snap)
    }
}
