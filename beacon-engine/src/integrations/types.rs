//! Client traits for the optional integration points.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("integration rejected the call: {0}")]
    Rejected(String),
    #[error("integration is unavailable: {0}")]
    Unavailable(String),
}

/// Callback invoked by an experiment SDK with its own payload (variant
/// activations, campaign data). The engine feeds these back into the
/// tracker as events.
pub type IntegrationCallback = Arc<dyn Fn(Value) + Send + Sync>;

/// First-generation experiment SDK surface: a plain `track` call.
pub trait ExperimentApi: Send + Sync {
    fn track(&self, event_name: &str, data: &Value) -> Result<(), IntegrationError>;

    /// Register a lifecycle callback. SDKs without callback support can
    /// leave the default no-op.
    fn on_activation(&self, _callback: IntegrationCallback) {}
}

/// Second-generation experiment SDK surface: `event` plus a
/// variation-applied notification.
pub trait ExperimentApiV2: Send + Sync {
    fn event(&self, event_name: &str, data: &Value) -> Result<(), IntegrationError>;

    fn on_variation_applied(&self, _callback: IntegrationCallback) {}
}

/// Whichever experiment SDK shape the host registered.
#[derive(Clone)]
pub enum ExperimentHandle {
    V1(Arc<dyn ExperimentApi>),
    V2(Arc<dyn ExperimentApiV2>),
}

/// An analytics tag function (GA-style): name, category, label, plus
/// the session id as a custom parameter.
pub trait TagClient: Send + Sync {
    fn tag(
        &self,
        event_name: &str,
        category: &str,
        label: &str,
        session_id: &str,
    ) -> Result<(), IntegrationError>;
}

/// A tag-manager data layer: a push-based queue of structured records.
pub trait DataLayer: Send + Sync {
    fn push(&self, record: Value) -> Result<(), IntegrationError>;
}
