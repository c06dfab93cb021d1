//! The instrumentation loop: consumes host signals and a fixed time
//! tick, feeds the tracker.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::milestones::{HoverTimer, ScrollDepth, TimeOnPage};
use super::signal::PageSignal;
use crate::page::PageContext;
use crate::tracker::Tracker;
use crate::variant::VariantResolver;

/// How often elapsed time is checked against the checkpoints.
pub const TIME_POLL_INTERVAL_SECS: u64 = 5;

pub struct Instrumentation {
    tracker: Arc<Tracker>,
    variants: Arc<VariantResolver>,
    page: Arc<PageContext>,
}

impl Instrumentation {
    pub fn new(
        tracker: Arc<Tracker>,
        variants: Arc<VariantResolver>,
        page: Arc<PageContext>,
    ) -> Self {
        Self {
            tracker,
            variants,
            page,
        }
    }

    /// Run the loop on a background task until `Unload`, channel close,
    /// or cancellation; all three paths emit the final summary events.
    pub fn spawn(
        self,
        signals: mpsc::UnboundedReceiver<PageSignal>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(signals, cancel))
    }

    async fn run(self, mut signals: mpsc::UnboundedReceiver<PageSignal>, cancel: CancellationToken) {
        let started = Instant::now();
        let mut scroll = ScrollDepth::new();
        let mut time = TimeOnPage::new();
        let mut hover = HoverTimer::new();

        let mut ticker =
            tokio::time::interval(Duration::from_secs(TIME_POLL_INTERVAL_SECS));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                signal = signals.recv() => match signal {
                    Some(PageSignal::Unload) | None => break,
                    Some(signal) => self.handle_signal(signal, &mut scroll, &mut hover),
                },
                _ = ticker.tick() => {
                    for checkpoint in time.observe(started.elapsed().as_secs()) {
                        self.track("time_on_page", json!({ "seconds": checkpoint }));
                    }
                }
            }
        }

        self.track(
            "final_scroll_depth",
            json!({ "percentage": scroll.max_percent() }),
        );
        self.track(
            "total_time_on_page",
            json!({ "seconds": started.elapsed().as_secs() }),
        );
        log::debug!("[WIRING] Instrumentation loop finished");
    }

    fn handle_signal(&self, signal: PageSignal, scroll: &mut ScrollDepth, hover: &mut HoverTimer) {
        match signal {
            PageSignal::Scrolled { percent } => {
                for milestone in scroll.observe(percent) {
                    self.track("scroll_depth", json!({ "percentage": milestone }));
                }
            }
            PageSignal::ElementClick {
                element_id,
                element_type,
                x,
                y,
            } => {
                self.track(
                    "element_click",
                    json!({
                        "elementId": element_id,
                        "elementType": element_type,
                        "coordinates": { "x": x, "y": y },
                    }),
                );
            }
            PageSignal::HoverStart { button_text } => hover.enter(&button_text),
            PageSignal::HoverEnd { button_text } => {
                if let Some(duration) = hover.leave(&button_text) {
                    self.track(
                        "button_hover",
                        json!({
                            "duration": duration.as_millis() as u64,
                            "buttonText": button_text,
                        }),
                    );
                }
            }
            PageSignal::FormSubmit { form_id } => {
                self.track("form_submission", json!({ "formId": form_id }));
            }
            // Handled by the loop before we get here.
            PageSignal::Unload => {}
        }
    }

    /// Every instrumentation event carries the resolved variant and the
    /// page path alongside its own payload.
    fn track(&self, event_name: &str, data: Value) {
        let mut data = data;
        if let Value::Object(map) = &mut data {
            let variant = self.variants.current(&self.page);
            map.insert("variant".to_string(), json!(variant.as_str()));
            map.insert("page".to_string(), json!(self.page.path()));
        }
        self.tracker.track(event_name, data);
    }
}
