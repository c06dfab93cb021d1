//! Integration tests for the tracking fan-out.
//!
//! These pin the sink-independence invariant: whatever one destination
//! does - missing, failing, slow to register - every other sink still
//! sees every tracked event, and the in-memory and durable logs stay
//! consistent.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use url::Url;

use crate::broadcast::EventBroadcaster;
use crate::config::Config;
use crate::db::Database;
use crate::db::tables::{STORED_EVENTS_CAP, VARIANT_KEY};
use crate::integrations::{
    DataLayer, ExperimentApi, ExperimentApiV2, IntegrationCallback, IntegrationError,
    IntegrationRegistry, TagClient, init_experiment_integration,
};
use crate::page::PageContext;
use crate::session::SessionTracker;
use crate::tracker::{SinkOutcome, Tracker, default_sinks};
use crate::variant::VariantResolver;
use beacon_types::{Event, Variant};

/// Wires up an in-memory database, an empty integration registry, a
/// broadcaster with one captive subscriber, and a tracker with the
/// standard sink chain.
struct TestHarness {
    db: Arc<Database>,
    registry: Arc<IntegrationRegistry>,
    tracker: Arc<Tracker>,
    variants: Arc<VariantResolver>,
    page: Arc<PageContext>,
    event_rx: mpsc::UnboundedReceiver<Event>,
}

impl TestHarness {
    fn new(url: &str, body_classes: &[&str]) -> Self {
        let db = Arc::new(Database::new(":memory:").expect("in-memory db"));
        let page = Arc::new(
            PageContext::new(Url::parse(url).expect("harness url"), "Harness Page")
                .with_body_classes(body_classes.iter().copied()),
        );
        let session = Arc::new(SessionTracker::new(db.clone(), 30));
        session.init();
        let variants = Arc::new(VariantResolver::new(db.clone(), 30));
        let registry = Arc::new(IntegrationRegistry::new());
        let broadcaster = Arc::new(EventBroadcaster::new());
        let (_client_id, event_rx) = broadcaster.subscribe();
        let tracker = Arc::new(Tracker::new(
            Config::default(),
            db.clone(),
            page.clone(),
            session,
            default_sinks(registry.clone(), db.clone(), broadcaster.clone()),
        ));
        Self {
            db,
            registry,
            tracker,
            variants,
            page,
            event_rx,
        }
    }
}

struct ExplodingSdk;

impl ExperimentApi for ExplodingSdk {
    fn track(&self, _event_name: &str, _data: &Value) -> Result<(), IntegrationError> {
        Err(IntegrationError::Rejected("boom".into()))
    }
}

#[derive(Default)]
struct RecordingSdkV2 {
    calls: Mutex<Vec<String>>,
}

impl ExperimentApiV2 for RecordingSdkV2 {
    fn event(&self, event_name: &str, _data: &Value) -> Result<(), IntegrationError> {
        self.calls.lock().push(event_name.to_string());
        Ok(())
    }
}

/// SDK that accepts the lifecycle callback the engine registers, so
/// tests can fire it by hand.
#[derive(Default)]
struct CallbackSdk {
    callback: Mutex<Option<IntegrationCallback>>,
}

impl ExperimentApi for CallbackSdk {
    fn track(&self, _event_name: &str, _data: &Value) -> Result<(), IntegrationError> {
        Ok(())
    }

    fn on_activation(&self, callback: IntegrationCallback) {
        *self.callback.lock() = Some(callback);
    }
}

#[derive(Default)]
struct RecordingTag {
    calls: Mutex<Vec<(String, String, String, String)>>,
}

impl TagClient for RecordingTag {
    fn tag(
        &self,
        event_name: &str,
        category: &str,
        label: &str,
        session_id: &str,
    ) -> Result<(), IntegrationError> {
        self.calls.lock().push((
            event_name.to_string(),
            category.to_string(),
            label.to_string(),
            session_id.to_string(),
        ));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingLayer {
    records: Mutex<Vec<Value>>,
}

impl DataLayer for RecordingLayer {
    fn push(&self, record: Value) -> Result<(), IntegrationError> {
        self.records.lock().push(record);
        Ok(())
    }
}

#[test]
fn track_appends_to_both_logs_and_reports_per_sink() {
    let mut harness = TestHarness::new("https://example.com/", &[]);

    let reports = harness.tracker.track("signup_click", json!({ "cta": "hero" }));

    assert_eq!(harness.tracker.event_count(), 1);
    assert_eq!(harness.db.stored_event_count().unwrap(), 1);

    // Fixed sink order; optional destinations are skips, not errors.
    assert_eq!(reports.len(), 4);
    assert_eq!(reports[0].sink, "experiment_sdk");
    assert!(matches!(reports[0].outcome, SinkOutcome::Skipped(_)));
    assert_eq!(reports[1].sink, "analytics_tags");
    assert!(matches!(reports[1].outcome, SinkOutcome::Skipped(_)));
    assert_eq!(reports[2].sink, "durable_store");
    assert_eq!(reports[2].outcome, SinkOutcome::Delivered);
    assert_eq!(reports[3].sink, "broadcast");
    assert_eq!(reports[3].outcome, SinkOutcome::Delivered);

    let notified = harness.event_rx.try_recv().unwrap();
    assert_eq!(notified.event_name, "signup_click");
}

#[test]
fn failing_sdk_never_blocks_the_other_sinks() {
    let mut harness = TestHarness::new("https://example.com/", &[]);
    harness.registry.register_experiment_v1(Arc::new(ExplodingSdk));

    let reports = harness.tracker.track("page_view", json!({}));

    assert_eq!(reports[0].outcome, SinkOutcome::Failed("integration rejected the call: boom".into()));
    assert_eq!(reports[2].outcome, SinkOutcome::Delivered);
    assert_eq!(reports[3].outcome, SinkOutcome::Delivered);
    assert_eq!(harness.db.stored_event_count().unwrap(), 1);
    assert!(harness.event_rx.try_recv().is_ok());
}

#[test]
fn v2_shape_is_used_when_registered() {
    let harness = TestHarness::new("https://example.com/", &[]);
    let sdk = Arc::new(RecordingSdkV2::default());
    harness.registry.register_experiment_v2(sdk.clone());

    let reports = harness.tracker.track("page_view", json!({}));

    assert_eq!(reports[0].outcome, SinkOutcome::Delivered);
    assert_eq!(sdk.calls.lock().as_slice(), ["page_view"]);
}

#[test]
fn tag_and_data_layer_are_fed_independently() {
    let harness = TestHarness::new("https://example.com/", &[]);
    let tag = Arc::new(RecordingTag::default());
    let layer = Arc::new(RecordingLayer::default());
    harness.registry.register_tag_client(tag.clone());
    harness.registry.register_data_layer(layer.clone());

    harness.tracker.track("email_signup", json!({ "variant": "B" }));

    let calls = tag.calls.lock();
    assert_eq!(calls.len(), 1);
    let (name, category, label, session_id) = &calls[0];
    assert_eq!(name, "email_signup");
    assert_eq!(category, "A/B Testing");
    assert_eq!(label, "B");
    assert!(session_id.starts_with("sess_"));

    let records = layer.records.lock();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["event"], "ab_test_conversion");
    assert_eq!(records[0]["eventName"], "email_signup");
    assert_eq!(records[0]["eventData"]["variant"], "B");
}

#[test]
fn durable_log_caps_at_one_hundred_fifo() {
    let harness = TestHarness::new("https://example.com/", &[]);
    for i in 0..STORED_EVENTS_CAP + 5 {
        harness.tracker.track(&format!("event_{i}"), json!({}));
    }

    // The in-memory log keeps everything for the page lifetime.
    assert_eq!(harness.tracker.event_count(), STORED_EVENTS_CAP + 5);

    let stored = harness.tracker.stored_events();
    assert_eq!(stored.len(), STORED_EVENTS_CAP);
    assert_eq!(stored[0].event_name, "event_5");
}

#[test]
fn events_are_enriched_with_session_and_page_context() {
    let harness = TestHarness::new("https://example.com/pricing?plan=pro", &[]);
    harness.tracker.track("page_view", json!({}));

    let event = &harness.tracker.events()[0];
    assert!(event.session_id.starts_with("sess_"));
    assert_eq!(event.page_url, "https://example.com/pricing?plan=pro");
    assert_eq!(event.page_title, "Harness Page");
    assert!(!event.timestamp.is_empty());
    assert_eq!(event.user_info.screen_resolution, "1920x1080");
}

#[test]
fn observer_hook_sees_every_report() {
    let harness = TestHarness::new("https://example.com/", &[]);
    let seen: Arc<Mutex<Vec<(String, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    harness.tracker.set_observer(Box::new(move |event, reports| {
        sink.lock().push((event.event_name.clone(), reports.len()));
    }));

    harness.tracker.track("a", json!({}));
    harness.tracker.track("b", json!({}));

    assert_eq!(seen.lock().as_slice(), [("a".to_string(), 4), ("b".to_string(), 4)]);
}

#[test]
fn clear_events_wipes_both_logs() {
    let harness = TestHarness::new("https://example.com/", &[]);
    harness.tracker.track("page_view", json!({}));
    harness.tracker.clear_events();

    assert_eq!(harness.tracker.event_count(), 0);
    assert_eq!(harness.db.stored_event_count().unwrap(), 0);
    assert!(harness.tracker.stored_events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn sdk_lifecycle_callbacks_feed_back_into_the_tracker() {
    let harness = TestHarness::new("https://example.com/", &[]);
    let sdk = Arc::new(CallbackSdk::default());
    harness.registry.register_experiment_v1(sdk.clone());

    let cancel = tokio_util::sync::CancellationToken::new();
    let found = init_experiment_integration(
        &harness.registry,
        harness.tracker.clone(),
        &Config::default(),
        &cancel,
    )
    .await;
    assert!(found);

    let callback = sdk.callback.lock().clone().expect("callback registered");
    callback(json!({ "campaign": 7 }));

    let events = harness.tracker.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_name, "sdk_callback");
    assert_eq!(events[0].event_data["campaign"], 7);
}

/// First page load with no persisted state, no URL override, and a
/// `variant-b` body marker: the visitor lands in B, the assignment is
/// persisted, and the first tracked event carries it.
#[test]
fn initial_page_load_with_body_marker_assigns_b_end_to_end() {
    let mut harness = TestHarness::new("https://example.com/landing", &["variant-b"]);

    let variant = harness.variants.detect(&harness.page);
    assert_eq!(variant, Variant::B);
    assert_eq!(harness.db.get_value(VARIANT_KEY).unwrap().as_deref(), Some("B"));

    harness.tracker.track(
        "page_view",
        json!({
            "variant": variant.as_str(),
            "page": harness.page.path(),
            "referrer": harness.page.referrer(),
        }),
    );

    let events = harness.tracker.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_name, "page_view");
    assert_eq!(events[0].event_data["variant"], "B");
    assert_eq!(events[0].event_data["page"], "/landing");

    // The durable copy and the notification carry the same snapshot.
    assert_eq!(harness.tracker.stored_events()[0].event_data["variant"], "B");
    assert_eq!(harness.event_rx.try_recv().unwrap().event_data["variant"], "B");
}
