//! Analytics tag sink. Two independent targets: the tag function gets
//! the fixed event-category enrichment, the data layer gets a
//! structured record. Both are attempted whenever present.

use std::sync::Arc;

use serde_json::json;

use super::types::{EventSink, SinkOutcome};
use crate::integrations::IntegrationRegistry;
use beacon_types::Event;

/// Category stamped onto every tag call.
pub const EVENT_CATEGORY: &str = "A/B Testing";

/// `event` field of every data-layer record.
pub const DATA_LAYER_EVENT: &str = "ab_test_conversion";

pub struct TagSink {
    registry: Arc<IntegrationRegistry>,
}

impl TagSink {
    pub fn new(registry: Arc<IntegrationRegistry>) -> Self {
        Self { registry }
    }
}

impl EventSink for TagSink {
    fn name(&self) -> &'static str {
        "analytics_tags"
    }

    fn deliver(&self, event: &Event) -> SinkOutcome {
        let tag_client = self.registry.tag_client();
        let data_layer = self.registry.data_layer();
        if tag_client.is_none() && data_layer.is_none() {
            return SinkOutcome::Skipped("no tag targets registered");
        }

        let mut failures = Vec::new();

        if let Some(client) = tag_client {
            let label = event
                .event_data
                .get("variant")
                .and_then(|v| v.as_str())
                .unwrap_or("default");
            if let Err(e) = client.tag(&event.event_name, EVENT_CATEGORY, label, &event.session_id)
            {
                failures.push(format!("tag: {e}"));
            }
        }

        if let Some(layer) = data_layer {
            let record = json!({
                "event": DATA_LAYER_EVENT,
                "eventName": event.event_name,
                "eventData": event.event_data,
                "sessionId": event.session_id,
            });
            if let Err(e) = layer.push(record) {
                failures.push(format!("data layer: {e}"));
            }
        }

        if failures.is_empty() {
            SinkOutcome::Delivered
        } else {
            SinkOutcome::Failed(failures.join("; "))
        }
    }
}
