//! Durable named values with expiry - the cookie-store analogue.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{OptionalExtension, Result as SqliteResult, params};

use super::super::Database;

/// Stable session identifier, refreshed on every engine init.
pub const SESSION_ID_KEY: &str = "ab_session_id";
/// Persisted experiment variant.
pub const VARIANT_KEY: &str = "ab_variant";
/// Page-view counter. Read by the engine, written by the host.
pub const PAGE_VIEWS_KEY: &str = "page_views";

impl Database {
    /// Write a named value with a TTL, replacing any previous value.
    pub fn set_value(&self, name: &str, value: &str, ttl_days: u32) -> SqliteResult<()> {
        let expires_at = Utc::now() + Duration::days(i64::from(ttl_days));
        let conn = self.conn();
        conn.execute(
            "INSERT INTO durable_kv (name, value, expires_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at",
            params![name, value, expires_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Read the freshest non-expired value, or None. Expired rows are
    /// deleted on read.
    pub fn get_value(&self, name: &str) -> SqliteResult<Option<String>> {
        let conn = self.conn();
        let row = conn
            .query_row(
                "SELECT value, expires_at FROM durable_kv WHERE name = ?1",
                [name],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        let Some((value, expires_at)) = row else {
            return Ok(None);
        };

        // An unparseable expiry counts as expired.
        let fresh = DateTime::parse_from_rfc3339(&expires_at)
            .map(|t| t.with_timezone(&Utc) > Utc::now())
            .unwrap_or(false);
        if fresh {
            Ok(Some(value))
        } else {
            conn.execute("DELETE FROM durable_kv WHERE name = ?1", [name])?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::new(":memory:").expect("in-memory db")
    }

    #[test]
    fn set_then_get_round_trips() {
        let db = db();
        db.set_value("ab_variant", "B", 30).unwrap();
        assert_eq!(db.get_value("ab_variant").unwrap().as_deref(), Some("B"));
    }

    #[test]
    fn missing_key_is_none_not_error() {
        let db = db();
        assert_eq!(db.get_value("nope").unwrap(), None);
    }

    #[test]
    fn overwrite_replaces_value() {
        let db = db();
        db.set_value("ab_variant", "A", 30).unwrap();
        db.set_value("ab_variant", "B", 30).unwrap();
        assert_eq!(db.get_value("ab_variant").unwrap().as_deref(), Some("B"));
    }

    #[test]
    fn expired_value_reads_as_none() {
        let db = db();
        let past = (Utc::now() - Duration::days(1)).to_rfc3339();
        db.conn()
            .execute(
                "INSERT INTO durable_kv (name, value, expires_at) VALUES (?1, ?2, ?3)",
                params!["ab_session_id", "sess_stale", past],
            )
            .unwrap();
        assert_eq!(db.get_value("ab_session_id").unwrap(), None);
        // The stale row is gone, not just filtered.
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM durable_kv", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
