//! "Can edit" capability, injected into the session instead of read from ambient storage.

use tokio::sync::watch;

/// Owner side: whoever knows the user's privileges flips this.
#[derive(Debug)]
pub struct EditPermission {
    tx: watch::Sender<bool>,
}

impl EditPermission {
    pub fn new(can_edit: bool) -> Self {
        let (tx, _rx) = watch::channel(can_edit);
        Self { tx }
    }

    pub fn set(&self, can_edit: bool) {
        self.tx.send_replace(can_edit);
    }

    pub fn gate(&self) -> EditGate {
        EditGate {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side handed to components that mutate data.
#[derive(Debug, Clone)]
pub struct EditGate {
    rx: watch::Receiver<bool>,
}

impl EditGate {
    /// Gate that never closes; for read-write hosts without a privilege model.
    pub fn always_open() -> Self {
        let (_tx, rx) = watch::channel(true);
        Self { rx }
    }

    pub fn can_edit(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for the next change and return the new value.
    /// Returns `None` once the owning `EditPermission` is gone.
    pub async fn changed(&mut self) -> Option<bool> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}
