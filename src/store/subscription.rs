use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::mpsc::{Receiver, Sender};

use serde_json::Value;

use super::StoreError;

/// One delivery from the store: the full value at the subscribed path, `None`
/// when nothing is stored there, or the error that prevented reading it.
pub type Snapshot = Result<Option<Value>, StoreError>;

/// Registry entry the store keeps for every live subscription.
pub(crate) struct Subscriber {
    pub(crate) id: u64,
    pub(crate) path: String,
    pub(crate) sender: Sender<Snapshot>,
}

pub(crate) type Registry = Rc<RefCell<Vec<Subscriber>>>;

/// Push-based stream of full snapshots for one store path.
///
/// Snapshots queue up until the owner drains them. Disposing removes the
/// subscription from the store; it is safe to call any number of times and
/// also happens on drop.
pub struct Subscription {
    id: u64,
    path: String,
    receiver: Receiver<Snapshot>,
    registry: Weak<RefCell<Vec<Subscriber>>>,
    disposed: Cell<bool>,
}

impl Subscription {
    pub(crate) fn new(
        id: u64,
        path: String,
        receiver: Receiver<Snapshot>,
        registry: &Registry,
    ) -> Self {
        Self {
            id,
            path,
            receiver,
            registry: Rc::downgrade(registry),
            disposed: Cell::new(false),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Take every snapshot delivered since the last call, oldest first.
    pub fn drain(&self) -> Vec<Snapshot> {
        if self.disposed.get() {
            return Vec::new();
        }
        self.receiver.try_iter().collect()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Stop receiving snapshots.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .retain(|subscriber| subscriber.id != self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}
