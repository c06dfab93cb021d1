//! Introspection surface exposed to embedding code (the console-debug
//! analogue): read the logs, the variant, and the session; clear state;
//! fire test events; export one consolidated snapshot.

use std::sync::Arc;

use serde_json::Value;

use crate::page::PageContext;
use crate::session::SessionTracker;
use crate::tracker::{SinkReport, Tracker};
use crate::variant::VariantResolver;
use beacon_types::{Event, ExportSnapshot, SessionData, Variant};

pub struct DebugSurface {
    tracker: Arc<Tracker>,
    variants: Arc<VariantResolver>,
    session: Arc<SessionTracker>,
    page: Arc<PageContext>,
}

impl DebugSurface {
    pub fn new(
        tracker: Arc<Tracker>,
        variants: Arc<VariantResolver>,
        session: Arc<SessionTracker>,
        page: Arc<PageContext>,
    ) -> Self {
        Self {
            tracker,
            variants,
            session,
            page,
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.tracker.events()
    }

    pub fn stored_events(&self) -> Vec<Event> {
        self.tracker.stored_events()
    }

    pub fn current_variant(&self) -> Variant {
        self.variants.current(&self.page)
    }

    pub fn session_data(&self) -> SessionData {
        self.session.session_data()
    }

    /// Drop the in-memory log and the durable log.
    pub fn clear_events(&self) {
        self.tracker.clear_events();
    }

    /// Fire a manual event through the full sink chain.
    pub fn track_test_event(&self, event_name: &str, data: Value) -> Vec<SinkReport> {
        self.tracker.track(event_name, data)
    }

    /// Consolidated snapshot: durable events plus the current variant,
    /// session, and agent facts.
    pub fn export(&self) -> ExportSnapshot {
        ExportSnapshot {
            events: self.tracker.stored_events(),
            variant: self.current_variant(),
            session: self.session_data(),
            user_info: self.page.user_info(),
        }
    }
}
