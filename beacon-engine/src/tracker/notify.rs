//! Broadcast sink. Synchronous in-process notification so observers
//! (debug overlays, host bridges) can react within the same tick.

use std::sync::Arc;

use super::types::{EventSink, SinkOutcome};
use crate::broadcast::EventBroadcaster;
use beacon_types::Event;

pub struct NotifySink {
    broadcaster: Arc<EventBroadcaster>,
}

impl NotifySink {
    pub fn new(broadcaster: Arc<EventBroadcaster>) -> Self {
        Self { broadcaster }
    }
}

impl EventSink for NotifySink {
    fn name(&self) -> &'static str {
        "broadcast"
    }

    fn deliver(&self, event: &Event) -> SinkOutcome {
        self.broadcaster.broadcast(event);
        SinkOutcome::Delivered
    }
}
