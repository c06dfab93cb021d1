//! Durable-log sink. Appends to the capped store; a storage failure is
//! logged and captured in the outcome, never raised.

use std::sync::Arc;

use super::types::{EventSink, SinkOutcome};
use crate::db::Database;
use beacon_types::Event;

pub struct StoreSink {
    db: Arc<Database>,
}

impl StoreSink {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl EventSink for StoreSink {
    fn name(&self) -> &'static str {
        "durable_store"
    }

    fn deliver(&self, event: &Event) -> SinkOutcome {
        match self.db.append_event(event) {
            Ok(()) => SinkOutcome::Delivered,
            Err(e) => {
                log::error!("[STORE] Failed to append event: {}", e);
                SinkOutcome::Failed(e.to_string())
            }
        }
    }
}
