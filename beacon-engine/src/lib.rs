//! Beacon: an embeddable experiment instrumentation engine.
//!
//! A host shell supplies a [`page::PageContext`] and a stream of
//! [`wiring::PageSignal`]s; Beacon assigns the visitor to an experiment
//! variant, records behavioral events, and relays each event to the
//! registered analytics integrations while keeping a durable local copy.
//! Delivery is best effort by design: a missing integration is skipped,
//! a failing one is caught and reported, and no sink ever blocks
//! another.

pub mod broadcast;
pub mod config;
pub mod db;
pub mod debug;
pub mod integrations;
pub mod page;
pub mod session;
pub mod tracker;
pub mod util;
pub mod variant;
pub mod wiring;

// Re-export the embedding surface.
pub use beacon_types::{Event, ExportSnapshot, SessionData, UserInfo, Variant};
pub use broadcast::{CONVERSION_TOPIC, EventBroadcaster};
pub use config::Config;
pub use db::Database;
pub use debug::DebugSurface;
pub use integrations::IntegrationRegistry;
pub use page::{AgentInfo, PageContext};
pub use session::SessionTracker;
pub use tracker::{EventSink, SinkOutcome, SinkReport, Tracker, default_sinks};
pub use variant::VariantResolver;
pub use wiring::{Instrumentation, PageSignal};
