//! Sink capability interface and per-dispatch reporting.

use beacon_types::Event;

/// What happened when an event was offered to one sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOutcome {
    Delivered,
    /// The sink's destination is not present; not an error.
    Skipped(&'static str),
    /// The destination exists but the call failed. Caught, never
    /// propagated.
    Failed(String),
}

impl SinkOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SinkOutcome::Delivered)
    }
}

/// One sink's outcome for one tracked event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkReport {
    pub sink: &'static str,
    pub outcome: SinkOutcome,
}

/// A destination for tracked events. Implementations must not block and
/// must swallow their own failures into the returned outcome.
pub trait EventSink: Send + Sync {
    fn name(&self) -> &'static str;

    fn deliver(&self, event: &Event) -> SinkOutcome;
}

/// Observability hook receiving the full per-sink report for every
/// tracked event.
pub type SinkObserver = Box<dyn Fn(&Event, &[SinkReport]) + Send + Sync>;
