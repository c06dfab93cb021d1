//! Late-binding slots for the optional integration clients.

use std::sync::Arc;

use parking_lot::RwLock;

use super::types::{DataLayer, ExperimentApi, ExperimentApiV2, ExperimentHandle, TagClient};

#[derive(Default)]
pub struct IntegrationRegistry {
    experiment: RwLock<Option<ExperimentHandle>>,
    tag: RwLock<Option<Arc<dyn TagClient>>>,
    data_layer: RwLock<Option<Arc<dyn DataLayer>>>,
}

impl IntegrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_experiment_v1(&self, client: Arc<dyn ExperimentApi>) {
        log::info!("[SDK] Experiment client registered (v1 shape)");
        *self.experiment.write() = Some(ExperimentHandle::V1(client));
    }

    pub fn register_experiment_v2(&self, client: Arc<dyn ExperimentApiV2>) {
        log::info!("[SDK] Experiment client registered (v2 shape)");
        *self.experiment.write() = Some(ExperimentHandle::V2(client));
    }

    pub fn register_tag_client(&self, client: Arc<dyn TagClient>) {
        log::info!("[SDK] Tag client registered");
        *self.tag.write() = Some(client);
    }

    pub fn register_data_layer(&self, layer: Arc<dyn DataLayer>) {
        log::info!("[SDK] Data layer registered");
        *self.data_layer.write() = Some(layer);
    }

    pub fn experiment(&self) -> Option<ExperimentHandle> {
        self.experiment.read().clone()
    }

    pub fn has_experiment(&self) -> bool {
        self.experiment.read().is_some()
    }

    pub fn tag_client(&self) -> Option<Arc<dyn TagClient>> {
        self.tag.read().clone()
    }

    pub fn data_layer(&self) -> Option<Arc<dyn DataLayer>> {
        self.data_layer.read().clone()
    }
}
