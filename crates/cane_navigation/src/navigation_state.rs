use std::sync::Arc;

use parking_lot::RwLock;

use crate::coordinate::Destination;

/// Holds the live navigation target.
///
/// The destination is swapped as a whole behind an [`Arc`], so readers always see either the
/// previous or the new destination, never a mix of the two. There is no clearing operation: once
/// set, a destination stays live until it is replaced.
#[derive(Default)]
pub struct NavigationStateStore {
    destination: RwLock<Option<Arc<Destination>>>,
}

impl NavigationStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_destination(&self, destination: Destination) {
        let destination = Arc::new(destination);
        *self.destination.write() = Some(destination);
    }

    /// The live destination, or `None` while no destination event has been received.
    pub fn current(&self) -> Option<Arc<Destination>> {
        self.destination.read().clone()
    }

    pub fn has_destination(&self) -> bool {
        self.destination.read().is_some()
    }
}
