//! Read-through caches backed by kube-runtime reflectors.
//!
//! Nodes, claims and backups are looked up on every validation but change
//! rarely, so they are served from watch-driven stores. The stores are
//! eventually consistent: a claim deleted a moment ago may still be found.
//! KubeVirt and Harvester re-check these references authoritatively.

use crate::error::StoreError;
use crds::VirtualMachineBackup;
use futures::StreamExt;
use k8s_openapi::api::core::v1::{Node, PersistentVolumeClaim};
use kube::{Api, Client};
use kube_runtime::reflector::{self, ObjectRef, Store};
use kube_runtime::{watcher, WatchStreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Spawns a reflector for `api` and returns its read handle.
///
/// The task runs until the process exits; watch errors are logged and the
/// stream reconnects with the default backoff.
fn spawn_reflector<K>(api: Api<K>, resource_name: &'static str) -> (Store<K>, JoinHandle<()>)
where
    K: kube::Resource + Clone + serde::de::DeserializeOwned + std::fmt::Debug + Send + Sync + 'static,
    K::DynamicType: Default + Eq + std::hash::Hash + Clone + Send + Sync + Unpin,
{
    let (reader, writer) = reflector::store();
    let stream = reflector::reflector(writer, watcher(api, watcher::Config::default()))
        .default_backoff()
        .touched_objects();

    let handle = tokio::spawn(async move {
        info!("Starting {} cache", resource_name);
        stream
            .for_each(|event| async move {
                match event {
                    Ok(_) => debug!("{} cache updated", resource_name),
                    Err(e) => warn!("{} cache watch error: {}", resource_name, e),
                }
            })
            .await;
        warn!("{} cache stream ended", resource_name);
    });

    (reader, handle)
}

/// Shared read-only caches of cluster registries.
#[derive(Clone)]
pub struct ClusterCache {
    nodes: Store<Node>,
    claims: Store<PersistentVolumeClaim>,
    backups: Store<VirtualMachineBackup>,
}

impl std::fmt::Debug for ClusterCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterCache")
            .field("nodes", &self.nodes.state().len())
            .field("claims", &self.claims.state().len())
            .field("backups", &self.backups.state().len())
            .finish()
    }
}

impl ClusterCache {
    /// Starts reflectors for nodes, claims and backups.
    ///
    /// Claims and backups are watched in `namespace` when given, otherwise
    /// cluster-wide. Returns the cache and the reflector task handles.
    pub fn start(client: Client, namespace: Option<&str>) -> (Self, Vec<JoinHandle<()>>) {
        let node_api: Api<Node> = Api::all(client.clone());
        let (claim_api, backup_api): (Api<PersistentVolumeClaim>, Api<VirtualMachineBackup>) =
            match namespace {
                Some(ns) => (
                    Api::namespaced(client.clone(), ns),
                    Api::namespaced(client, ns),
                ),
                None => (Api::all(client.clone()), Api::all(client)),
            };

        let (nodes, node_task) = spawn_reflector(node_api, "Node");
        let (claims, claim_task) = spawn_reflector(claim_api, "PersistentVolumeClaim");
        let (backups, backup_task) = spawn_reflector(backup_api, "VirtualMachineBackup");

        (
            Self {
                nodes,
                claims,
                backups,
            },
            vec![node_task, claim_task, backup_task],
        )
    }

    /// Waits for every store to complete its initial list.
    pub async fn wait_until_ready(&self, timeout: Duration) -> Result<(), StoreError> {
        let ready = async {
            self.nodes.wait_until_ready().await?;
            self.claims.wait_until_ready().await?;
            self.backups.wait_until_ready().await
        };
        match tokio::time::timeout(timeout, ready).await {
            Ok(Ok(())) => {
                info!("Cluster caches synced");
                Ok(())
            }
            Ok(Err(e)) => Err(StoreError::CacheSync(e.to_string())),
            Err(_) => Err(StoreError::CacheSync(format!(
                "caches not synced after {}s",
                timeout.as_secs()
            ))),
        }
    }

    pub fn node(&self, name: &str) -> Option<Arc<Node>> {
        self.nodes.get(&ObjectRef::new(name))
    }

    pub fn claim(&self, namespace: &str, name: &str) -> Option<Arc<PersistentVolumeClaim>> {
        self.claims.get(&ObjectRef::new(name).within(namespace))
    }

    pub fn backup(&self, namespace: &str, name: &str) -> Option<Arc<VirtualMachineBackup>> {
        self.backups.get(&ObjectRef::new(name).within(namespace))
    }
}
