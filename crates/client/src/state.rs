use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{config::Config, service::SessionStore, utils::Metrics};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::di::DependenciesInject;

#[derive(Debug)]
pub struct AppState {
    pub registry: Arc<Mutex<Registry>>,
    pub metrics: Arc<Mutex<Metrics>>,
    pub di_container: DependenciesInject,
    pub sessions: SessionStore,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self> {
        let registry = Arc::new(Mutex::new(Registry::default()));
        let metrics = Arc::new(Mutex::new(Metrics::new()));

        let di_container = {
            let mut registry = registry.lock().await;
            DependenciesInject::new(config, metrics.clone(), &mut registry)
                .await
                .context("Failed to initialize dependency injection container")?
        };

        Ok(Self {
            registry,
            metrics,
            di_container,
            sessions: SessionStore::new(config.session_idle_ttl),
        })
    }
}
