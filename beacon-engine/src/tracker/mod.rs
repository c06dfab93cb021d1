//! Event tracking fan-out.
//!
//! `Tracker::track` builds an enriched event snapshot, appends it to the
//! in-memory log, and hands it to each sink in a fixed order. Sinks are
//! isolated: one failing or missing destination never blocks another.

pub mod tracker;
pub mod types;

mod experiment;
mod notify;
mod store;
mod tags;

pub use experiment::ExperimentSdkSink;
pub use notify::NotifySink;
pub use store::StoreSink;
pub use tags::TagSink;
pub use tracker::{Tracker, default_sinks};
pub use types::{EventSink, SinkObserver, SinkOutcome, SinkReport};

#[cfg(test)]
mod tracker_tests;
