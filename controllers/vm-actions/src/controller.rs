//! Main controller implementation.
//!
//! This module contains the `Controller` struct that wires the Kubernetes
//! client, the cluster caches and the action orchestrator into the HTTP
//! server, and keeps them running.

use crate::backup_target::SettingBackupTarget;
use crate::config::ServerConfig;
use crate::error::ActionError;
use crate::orchestrator::ActionOrchestrator;
use crate::server::{self, AppState};
use futures::future::select_all;
use kube::Client;
use kubevirt_client::{ClusterCache, KubeVirtClient, KubeVirtClientTrait};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Main controller for the VM action server.
pub struct Controller {
    server: JoinHandle<Result<(), ActionError>>,
    cache_tasks: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("cache_tasks", &self.cache_tasks.len())
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Creates a new controller instance.
    ///
    /// Startup blocks until the node, claim and backup caches have synced.
    pub async fn new(config: ServerConfig) -> Result<Self, ActionError> {
        info!("Initializing VM action server");

        let kube_client = Client::try_default().await?;

        let (cache, cache_tasks) =
            ClusterCache::start(kube_client.clone(), config.watch_namespace.as_deref());
        cache
            .wait_until_ready(config.cache_sync_timeout)
            .await
            .map_err(|e| ActionError::Internal(format!("cache sync failed: {}", e)))?;

        let client: Arc<dyn KubeVirtClientTrait> =
            Arc::new(KubeVirtClient::new(kube_client).with_cache(cache));
        let backup_target = Arc::new(SettingBackupTarget::new(
            client.clone(),
            config.backup_target_setting.clone(),
        ));
        let orchestrator = Arc::new(ActionOrchestrator::new(client, backup_target));

        let app = server::router(AppState { orchestrator });
        let addr = config.listen_addr;
        let server = tokio::spawn(async move { server::serve(addr, app).await });

        Ok(Self {
            server,
            cache_tasks,
        })
    }

    /// Runs the controller until the server or a cache task exits.
    pub async fn run(mut self) -> Result<(), ActionError> {
        info!("VM action server running");

        if self.cache_tasks.is_empty() {
            return (&mut self.server)
                .await
                .map_err(|e| ActionError::Task(format!("server panicked: {}", e)))?;
        }

        tokio::select! {
            result = &mut self.server => {
                result.map_err(|e| ActionError::Task(format!("server panicked: {}", e)))??;
            }
            (result, index, _) = select_all(self.cache_tasks.iter_mut()) => {
                result.map_err(|e| ActionError::Task(format!("cache task {} panicked: {}", index, e)))?;
                return Err(ActionError::Task(format!("cache task {} ended", index)));
            }
        }

        Ok(())
    }
}
