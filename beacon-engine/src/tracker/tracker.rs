use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use super::types::{EventSink, SinkObserver, SinkOutcome, SinkReport};
use super::{ExperimentSdkSink, NotifySink, StoreSink, TagSink};
use crate::broadcast::EventBroadcaster;
use crate::config::Config;
use crate::db::Database;
use crate::integrations::IntegrationRegistry;
use crate::page::PageContext;
use crate::session::SessionTracker;
use crate::util;
use beacon_types::Event;

/// The standard sink chain, in dispatch order: experiment SDK, analytics
/// tags, durable store, in-process broadcast.
pub fn default_sinks(
    registry: Arc<IntegrationRegistry>,
    db: Arc<Database>,
    broadcaster: Arc<EventBroadcaster>,
) -> Vec<Box<dyn EventSink>> {
    vec![
        Box::new(ExperimentSdkSink::new(registry.clone())),
        Box::new(TagSink::new(registry)),
        Box::new(StoreSink::new(db)),
        Box::new(NotifySink::new(broadcaster)),
    ]
}

/// The fan-out hub. Stateless per call apart from the append-only
/// in-memory log.
pub struct Tracker {
    config: Config,
    db: Arc<Database>,
    page: Arc<PageContext>,
    session: Arc<SessionTracker>,
    sinks: Vec<Box<dyn EventSink>>,
    events: Mutex<Vec<Event>>,
    observer: Mutex<Option<SinkObserver>>,
}

impl Tracker {
    pub fn new(
        config: Config,
        db: Arc<Database>,
        page: Arc<PageContext>,
        session: Arc<SessionTracker>,
        sinks: Vec<Box<dyn EventSink>>,
    ) -> Self {
        Self {
            config,
            db,
            page,
            session,
            sinks,
            events: Mutex::new(Vec::new()),
            observer: Mutex::new(None),
        }
    }

    /// Install the observability hook receiving per-sink reports.
    pub fn set_observer(&self, observer: SinkObserver) {
        *self.observer.lock() = Some(observer);
    }

    /// Record an event: snapshot, append to the in-memory log, then
    /// offer it to every sink in order. Sink failures are captured in
    /// the returned reports and never abort the remaining sinks.
    pub fn track(&self, event_name: &str, event_data: Value) -> Vec<SinkReport> {
        let event = self.build_event(event_name, event_data);
        self.events.lock().push(event.clone());

        let mut reports = Vec::with_capacity(self.sinks.len());
        for sink in &self.sinks {
            let outcome = sink.deliver(&event);
            match &outcome {
                SinkOutcome::Delivered => {
                    if self.config.debug {
                        log::debug!("[TRACKER] {} -> {}: delivered", event.event_name, sink.name());
                    }
                }
                SinkOutcome::Skipped(reason) => {
                    if self.config.debug {
                        log::debug!(
                            "[TRACKER] {} -> {}: skipped ({})",
                            event.event_name,
                            sink.name(),
                            reason
                        );
                    }
                }
                SinkOutcome::Failed(error) => {
                    log::warn!(
                        "[TRACKER] {} -> {}: failed ({})",
                        event.event_name,
                        sink.name(),
                        error
                    );
                }
            }
            reports.push(SinkReport {
                sink: sink.name(),
                outcome,
            });
        }

        if let Some(observer) = self.observer.lock().as_ref() {
            observer(&event, &reports);
        }
        reports
    }

    /// Snapshot of the in-memory event log for this page load.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().len()
    }

    /// Contents of the durable event log (empty on any storage failure).
    pub fn stored_events(&self) -> Vec<Event> {
        self.db.stored_events()
    }

    /// Drop both the in-memory and the durable log.
    pub fn clear_events(&self) {
        self.events.lock().clear();
        match self.db.clear_events() {
            Ok(count) => log::info!("[TRACKER] Cleared {} stored events", count),
            Err(e) => log::error!("[TRACKER] Failed to clear stored events: {}", e),
        }
    }

    fn build_event(&self, event_name: &str, event_data: Value) -> Event {
        Event {
            event_name: event_name.to_string(),
            event_data,
            timestamp: util::now_iso(),
            session_id: self.session.session_id().unwrap_or_default(),
            page_url: self.page.href().to_string(),
            page_title: self.page.title().to_string(),
            user_info: self.page.user_info(),
        }
    }
}
