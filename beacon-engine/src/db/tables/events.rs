//! Durable event log - append-only JSON rows, capped at the most
//! recent 100 (oldest evicted first).

use chrono::Utc;
use rusqlite::{Result as SqliteResult, params};

use super::super::Database;
use beacon_types::Event;

/// Storage identity of the durable event log. The engine keeps the log
/// in the `stored_events` table; hosts mirroring it into web storage
/// use this key.
pub const STORED_EVENTS_KEY: &str = "ab_test_events";
/// Keep only the newest this-many events.
pub const STORED_EVENTS_CAP: usize = 100;

impl Database {
    /// Append one event and evict the oldest rows beyond the cap.
    pub fn append_event(&self, event: &Event) -> SqliteResult<()> {
        let payload = serde_json::to_string(event).map_err(|e| {
            rusqlite::Error::ToSqlConversionFailure(Box::new(e))
        })?;
        let conn = self.conn();
        conn.execute(
            "INSERT INTO stored_events (event_name, payload, created_at) VALUES (?1, ?2, ?3)",
            params![event.event_name, payload, Utc::now().to_rfc3339()],
        )?;
        conn.execute(
            "DELETE FROM stored_events WHERE id NOT IN
                (SELECT id FROM stored_events ORDER BY id DESC LIMIT ?1)",
            params![STORED_EVENTS_CAP as i64],
        )?;
        Ok(())
    }

    /// All stored events, oldest first. A read failure or a malformed
    /// payload degrades to an empty list - the caller never sees an
    /// error from the durable log.
    pub fn stored_events(&self) -> Vec<Event> {
        match self.stored_event_payloads() {
            Ok(payloads) => {
                let parsed: Result<Vec<Event>, _> = payloads
                    .iter()
                    .map(|p| serde_json::from_str::<Event>(p))
                    .collect();
                match parsed {
                    Ok(events) => events,
                    Err(e) => {
                        log::error!("[STORE] Malformed stored event payload: {}", e);
                        Vec::new()
                    }
                }
            }
            Err(e) => {
                log::error!("[STORE] Failed to read stored events: {}", e);
                Vec::new()
            }
        }
    }

    /// Drop every stored event, returning how many were removed.
    pub fn clear_events(&self) -> SqliteResult<usize> {
        let conn = self.conn();
        conn.execute("DELETE FROM stored_events", [])
    }

    pub fn stored_event_count(&self) -> SqliteResult<i64> {
        let conn = self.conn();
        conn.query_row("SELECT COUNT(*) FROM stored_events", [], |r| r.get(0))
    }

    fn stored_event_payloads(&self) -> SqliteResult<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT payload FROM stored_events ORDER BY id")?;
        let payloads = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(payloads)
    }
}
