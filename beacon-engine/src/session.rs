//! Session bookkeeping: a stable durable identifier plus the start time
//! of the current page load.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::db::Database;
use crate::db::tables::{PAGE_VIEWS_KEY, SESSION_ID_KEY};
use crate::util;
use beacon_types::SessionData;

pub struct SessionTracker {
    db: Arc<Database>,
    ttl_days: u32,
    session_id: Mutex<Option<String>>,
    started_at: Mutex<DateTime<Utc>>,
}

impl SessionTracker {
    pub fn new(db: Arc<Database>, ttl_days: u32) -> Self {
        Self {
            db,
            ttl_days,
            session_id: Mutex::new(None),
            started_at: Mutex::new(Utc::now()),
        }
    }

    /// Reuse the persisted session id or mint a new one, refresh its
    /// TTL, and reset the page-load start time. Safe to call more than
    /// once: an existing id is never replaced.
    pub fn init(&self) -> String {
        let existing = self.db.get_value(SESSION_ID_KEY).unwrap_or_else(|e| {
            log::error!("[SESSION] Failed to read session id: {}", e);
            None
        });
        let id = existing.unwrap_or_else(util::generate_session_id);

        if let Err(e) = self.db.set_value(SESSION_ID_KEY, &id, self.ttl_days) {
            log::error!("[SESSION] Failed to persist session id: {}", e);
        }

        *self.session_id.lock() = Some(id.clone());
        *self.started_at.lock() = Utc::now();
        log::info!("[SESSION] Initialized session {}", id);
        id
    }

    pub fn session_id(&self) -> Option<String> {
        self.session_id.lock().clone()
    }

    /// Point-in-time session view. The `page_views` counter is read from
    /// durable storage and reported plus one for the view in progress;
    /// the engine never increments it - the host owns the counter.
    pub fn session_data(&self) -> SessionData {
        let session_id = self.session_id.lock().clone().unwrap_or_default();
        let duration_ms = (Utc::now() - *self.started_at.lock()).num_milliseconds().max(0);
        let counter = self
            .db
            .get_value(PAGE_VIEWS_KEY)
            .ok()
            .flatten()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);
        SessionData {
            session_id,
            duration_ms,
            page_views: counter + 1,
        }
    }
}
