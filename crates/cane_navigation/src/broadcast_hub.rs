use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::dispatcher::{BroadcastMessage, NavigationBroadcaster};

pub type ListenerId = Uuid;

/// Messages a listener may have pending before it is considered stalled and evicted.
pub const LISTENER_QUEUE_CAPACITY: usize = 32;

/// Receiving end of a registered listener. Dropping it disconnects the listener; the hub
/// forgets it on the next broadcast. `recv` returns `None` once the hub has evicted it.
pub struct Listener {
    id: ListenerId,
    receiver: Receiver<Arc<str>>,
}

impl Listener {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub async fn recv(&mut self) -> Option<Arc<str>> {
        self.receiver.recv().await
    }
}

/// Registry of connected broadcast listeners.
#[derive(Default)]
pub struct BroadcastHub {
    listeners: RwLock<HashMap<ListenerId, Sender<Arc<str>>>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self) -> Listener {
        let (sender, receiver) = mpsc::channel(LISTENER_QUEUE_CAPACITY);
        let id = Uuid::new_v4();
        self.listeners.write().insert(id, sender);

        debug!("Broadcast listener {} registered", id);

        Listener { id, receiver }
    }

    pub fn unregister(&self, id: ListenerId) {
        if self.listeners.write().remove(&id).is_some() {
            debug!("Broadcast listener {} unregistered", id);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Sends `text` to every listener without waiting. A listener that is gone or whose queue
    /// is full is dropped from the registry and does not affect delivery to the others.
    pub fn send_text(&self, text: Arc<str>) -> usize {
        let mut delivered = 0;
        let mut evicted = vec![];

        for (id, sender) in self.listeners.read().iter() {
            match sender.try_send(Arc::clone(&text)) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!("Broadcast listener {} is not keeping up, evicting", id);
                    evicted.push(*id);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!("Broadcast listener {} disconnected", id);
                    evicted.push(*id);
                }
            }
        }

        if !evicted.is_empty() {
            let mut listeners = self.listeners.write();
            for id in evicted {
                listeners.remove(&id);
            }
        }

        delivered
    }
}

impl NavigationBroadcaster for BroadcastHub {
    fn broadcast(&self, message: &BroadcastMessage) -> usize {
        match serde_json::to_string(message) {
            Ok(text) => self.send_text(text.into()),
            Err(err) => {
                error!("Failed to serialize broadcast message: {}", err);
                0
            }
        }
    }
}
