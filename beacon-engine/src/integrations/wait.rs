//! Bounded wait for a late-arriving experiment SDK.
//!
//! Experiment SDKs typically load out-of-band, so the engine polls the
//! registry for a while instead of requiring registration up front. The
//! wait is bounded by a timeout and a cancellation token; it never spins
//! past either.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::registry::IntegrationRegistry;
use super::types::ExperimentHandle;
use crate::config::Config;
use crate::tracker::Tracker;

/// Poll the registry until an experiment client appears. Returns true
/// as soon as one is registered, false on timeout or cancellation.
pub async fn wait_for_experiment_sdk(
    registry: &IntegrationRegistry,
    timeout: Duration,
    poll: Duration,
    cancel: &CancellationToken,
) -> bool {
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);
    let mut ticker = tokio::time::interval(poll);

    loop {
        if registry.has_experiment() {
            return true;
        }
        tokio::select! {
            _ = cancel.cancelled() => return false,
            _ = &mut deadline => return false,
            _ = ticker.tick() => {}
        }
    }
}

/// Wait for the experiment SDK and, once present, wire its lifecycle
/// callbacks back into the tracker. Returns whether the SDK showed up
/// within the window.
pub async fn init_experiment_integration(
    registry: &IntegrationRegistry,
    tracker: Arc<Tracker>,
    config: &Config,
    cancel: &CancellationToken,
) -> bool {
    let found = wait_for_experiment_sdk(
        registry,
        Duration::from_millis(config.sdk_wait_timeout_ms),
        Duration::from_millis(config.sdk_poll_interval_ms),
        cancel,
    )
    .await;

    if !found {
        log::info!("[SDK] Experiment SDK not detected within timeout; events stay local");
        return false;
    }

    log::info!("[SDK] Experiment SDK detected, wiring callbacks");
    match registry.experiment() {
        Some(ExperimentHandle::V1(client)) => {
            let tracker = tracker.clone();
            client.on_activation(Arc::new(move |data: Value| {
                tracker.track("sdk_callback", data);
            }));
        }
        Some(ExperimentHandle::V2(client)) => {
            let tracker = tracker.clone();
            client.on_variation_applied(Arc::new(move |data: Value| {
                tracker.track("sdk_variation_applied", data);
            }));
        }
        None => {}
    }
    true
}
