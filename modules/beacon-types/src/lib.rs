//! Shared types for the Beacon instrumentation engine.
//!
//! Embedding hosts (webview shells, kiosk apps, test harnesses) consume
//! these types when subscribing to conversion notifications or mirroring
//! the durable event log. Field names serialize in the camelCase wire
//! format that downstream analytics tooling already expects.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The experiment bucket a visitor is assigned to.
///
/// Conventionally `A` or `B`, but the set is open: a URL override or a
/// persisted value can carry any tag, which round-trips as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Variant {
    A,
    B,
    Other(String),
}

impl Variant {
    pub fn as_str(&self) -> &str {
        match self {
            Variant::A => "A",
            Variant::B => "B",
            Variant::Other(tag) => tag,
        }
    }
}

impl From<String> for Variant {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "A" => Variant::A,
            "B" => Variant::B,
            _ => Variant::Other(tag),
        }
    }
}

impl From<&str> for Variant {
    fn from(tag: &str) -> Self {
        Variant::from(tag.to_string())
    }
}

impl From<Variant> for String {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Browser/agent facts snapshotted at track time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_agent: String,
    pub language: String,
    pub platform: String,
    pub cookie_enabled: bool,
    /// `"{width}x{height}"`
    pub screen_resolution: String,
    /// ISO-8601, when this snapshot was taken
    pub timestamp: String,
}

/// A recorded user interaction or lifecycle moment, enriched with
/// session, page, and agent context. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_name: String,
    /// Arbitrary payload supplied by the caller (always a JSON object).
    pub event_data: Value,
    /// ISO-8601, when the event was tracked
    pub timestamp: String,
    pub session_id: String,
    pub page_url: String,
    pub page_title: String,
    pub user_info: UserInfo,
}

/// Point-in-time view of the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub session_id: String,
    /// Milliseconds since the engine started for this page load.
    #[serde(rename = "duration")]
    pub duration_ms: i64,
    /// Page views including the one in progress. The durable counter
    /// behind this is maintained by the host, never by the engine.
    pub page_views: u64,
}

/// Consolidated snapshot produced by the debug surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub events: Vec<Event>,
    pub variant: Variant,
    pub session: SessionData,
    pub user_info: UserInfo,
}
