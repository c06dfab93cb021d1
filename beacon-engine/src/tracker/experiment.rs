//! Experiment-SDK sink. Forwards events to whichever client shape the
//! host registered; absent client is a skip, a client error is caught
//! into the outcome.

use std::sync::Arc;

use super::types::{EventSink, SinkOutcome};
use crate::integrations::{ExperimentHandle, IntegrationRegistry};
use beacon_types::Event;

pub struct ExperimentSdkSink {
    registry: Arc<IntegrationRegistry>,
}

impl ExperimentSdkSink {
    pub fn new(registry: Arc<IntegrationRegistry>) -> Self {
        Self { registry }
    }
}

impl EventSink for ExperimentSdkSink {
    fn name(&self) -> &'static str {
        "experiment_sdk"
    }

    fn deliver(&self, event: &Event) -> SinkOutcome {
        let result = match self.registry.experiment() {
            Some(ExperimentHandle::V1(client)) => {
                client.track(&event.event_name, &event.event_data)
            }
            Some(ExperimentHandle::V2(client)) => {
                client.event(&event.event_name, &event.event_data)
            }
            None => return SinkOutcome::Skipped("no experiment client registered"),
        };
        match result {
            Ok(()) => SinkOutcome::Delivered,
            Err(e) => SinkOutcome::Failed(e.to_string()),
        }
    }
}
