//! Optional third-party analytics integrations.
//!
//! None of these are required: the host registers whichever clients it
//! has, whenever they become available, and the sinks capability-check
//! the registry on every dispatch. A missing integration is a skip, a
//! failing one is caught and reported, and neither blocks anything.

pub mod registry;
pub mod types;
pub mod wait;

pub use registry::IntegrationRegistry;
pub use types::{
    DataLayer, ExperimentApi, ExperimentApiV2, ExperimentHandle, IntegrationCallback,
    IntegrationError, TagClient,
};
pub use wait::{init_experiment_integration, wait_for_experiment_sdk};
