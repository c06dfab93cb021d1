use std::sync::Arc;
use std::time::Duration;

use dotenv::dotenv;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

use beacon_engine::integrations::{self, ExperimentApi, IntegrationError};
use beacon_engine::{
    Config, Database, DebugSurface, EventBroadcaster, Instrumentation, IntegrationRegistry,
    PageSignal, PageContext, SessionTracker, Tracker, VariantResolver, default_sinks,
};

/// Demo experiment client: logs whatever the engine forwards.
struct ConsoleExperimentClient;

impl ExperimentApi for ConsoleExperimentClient {
    fn track(&self, event_name: &str, data: &Value) -> Result<(), IntegrationError> {
        log::info!("[SDK] track {} {}", event_name, data);
        Ok(())
    }
}

fn page_from_env() -> PageContext {
    let url = std::env::var("BEACON_PAGE_URL")
        .unwrap_or_else(|_| "https://example.com/product-b".to_string());
    let url = Url::parse(&url).expect("BEACON_PAGE_URL must be a valid URL");
    let title =
        std::env::var("BEACON_PAGE_TITLE").unwrap_or_else(|_| "Example Product".to_string());
    let referrer = std::env::var("BEACON_REFERRER").unwrap_or_default();
    let body_classes: Vec<String> = std::env::var("BEACON_BODY_CLASSES")
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    PageContext::new(url, title)
        .with_referrer(referrer)
        .with_body_classes(body_classes)
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    log::info!("Initializing store at {}", config.database_url);
    let db = Arc::new(Database::new(&config.database_url).expect("Failed to initialize store"));

    let page = Arc::new(page_from_env());
    let session = Arc::new(SessionTracker::new(db.clone(), config.cookie_ttl_days));
    session.init();

    let variants = Arc::new(VariantResolver::new(db.clone(), config.cookie_ttl_days));
    let variant = variants.detect(&page);
    log::info!("Visitor assigned to variant {}", variant);

    let registry = Arc::new(IntegrationRegistry::new());
    let broadcaster = Arc::new(EventBroadcaster::new());
    let tracker = Arc::new(Tracker::new(
        config.clone(),
        db.clone(),
        page.clone(),
        session.clone(),
        default_sinks(registry.clone(), db.clone(), broadcaster.clone()),
    ));
    if config.debug {
        tracker.set_observer(Box::new(|event, reports| {
            for report in reports {
                log::debug!(
                    "[OBSERVER] {} -> {}: {:?}",
                    event.event_name,
                    report.sink,
                    report.outcome
                );
            }
        }));
    }

    let cancel = CancellationToken::new();
    let (signals, signal_rx) = mpsc::unbounded_channel();
    let wiring = Instrumentation::new(tracker.clone(), variants.clone(), page.clone())
        .spawn(signal_rx, cancel.clone());

    // A real host registers its SDK whenever the vendor script lands;
    // the demo does so shortly after startup to exercise the bounded
    // wait.
    let late = registry.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        late.register_experiment_v1(Arc::new(ConsoleExperimentClient));
    });
    integrations::init_experiment_integration(&registry, tracker.clone(), &config, &cancel).await;

    tracker.track(
        "page_view",
        json!({
            "variant": variant.as_str(),
            "page": page.path(),
            "referrer": page.referrer(),
        }),
    );

    // Simulated visit.
    for percent in [20u8, 45, 70, 100] {
        let _ = signals.send(PageSignal::Scrolled { percent });
    }
    let _ = signals.send(PageSignal::HoverStart {
        button_text: "Start Free Trial".into(),
    });
    tokio::time::sleep(Duration::from_millis(150)).await;
    let _ = signals.send(PageSignal::HoverEnd {
        button_text: "Start Free Trial".into(),
    });
    let _ = signals.send(PageSignal::ElementClick {
        element_id: "hero-cta".into(),
        element_type: "button".into(),
        x: 320,
        y: 540,
    });
    let _ = signals.send(PageSignal::FormSubmit {
        form_id: "signup".into(),
    });
    tokio::time::sleep(Duration::from_millis(200)).await;

    cancel.cancel();
    let _ = wiring.await;

    let debug = DebugSurface::new(tracker, variants, session, page);
    let snapshot = debug.export();
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).expect("snapshot serializes")
    );
}
