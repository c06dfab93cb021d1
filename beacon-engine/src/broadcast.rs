//! In-process conversion notifications.
//!
//! Observers (debug overlays, host bridges) subscribe and receive every
//! tracked event. Delivery happens inline with `track()` - sends are
//! non-blocking, so a slow subscriber can lag but never stall the
//! tracking path. A bounded ring buffer keeps recent events for replay
//! to late subscribers.

use std::collections::VecDeque;

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

use beacon_types::Event;

/// Notification name hosts re-dispatch these events under (e.g. as a
/// DOM custom event).
pub const CONVERSION_TOPIC: &str = "abTestConversion";

/// Max number of recent events kept for replay on subscribe.
const REPLAY_BUFFER_SIZE: usize = 100;

pub struct EventBroadcaster {
    clients: DashMap<String, mpsc::UnboundedSender<Event>>,
    recent: Mutex<VecDeque<Event>>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self {
            clients: DashMap::new(),
            recent: Mutex::new(VecDeque::with_capacity(REPLAY_BUFFER_SIZE)),
        }
    }

    /// Subscribe a new observer and return (client_id, receiver).
    pub fn subscribe(&self) -> (String, mpsc::UnboundedReceiver<Event>) {
        let client_id = Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::unbounded_channel();
        self.clients.insert(client_id.clone(), tx);
        log::debug!("[BROADCAST] Client {} subscribed", client_id);
        (client_id, rx)
    }

    pub fn unsubscribe(&self, client_id: &str) {
        self.clients.remove(client_id);
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Snapshot of recent events for replaying to late subscribers.
    pub fn recent_events(&self) -> Vec<Event> {
        self.recent.lock().iter().cloned().collect()
    }

    /// Deliver an event to every subscriber and buffer it for replay.
    /// Subscribers whose receiver is gone are pruned.
    pub fn broadcast(&self, event: &Event) {
        {
            let mut recent = self.recent.lock();
            if recent.len() >= REPLAY_BUFFER_SIZE {
                recent.pop_front();
            }
            recent.push_back(event.clone());
        }

        let mut dead = Vec::new();
        for entry in self.clients.iter() {
            if entry.value().send(event.clone()).is_err() {
                dead.push(entry.key().clone());
            }
        }
        for client_id in dead {
            log::debug!("[BROADCAST] Pruning disconnected client {}", client_id);
            self.clients.remove(&client_id);
        }
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
