//! kube-rs backed object store client

use crate::cache::ClusterCache;
use crate::error::StoreError;
use crate::kubevirt_trait::KubeVirtClientTrait;
use crds::{
    ADD_VOLUME_SUBRESOURCE, AddVolumeOptions, BackingImage, HARVESTER_API_GROUP,
    HARVESTER_API_VERSION, REMOVE_VOLUME_SUBRESOURCE, RemoveVolumeOptions, SETTING_KIND,
    SUBRESOURCE_API_GROUP, SUBRESOURCE_API_VERSION, Setting, VirtualMachine, VirtualMachineBackup,
    VirtualMachineInstance, VirtualMachineInstanceMigration, VirtualMachineRestore,
    VirtualMachineTemplate, VirtualMachineTemplateVersion, VmOperation, VmiOperation,
};
use k8s_openapi::api::core::v1::{Node, PersistentVolumeClaim};
use kube::api::{ApiResource, DeleteParams, DynamicObject, GroupVersionKind, ListParams, PostParams};
use kube::{Api, Client, Resource, ResourceExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

const VIRTUAL_MACHINES: &str = "virtualmachines";
const VIRTUAL_MACHINE_INSTANCES: &str = "virtualmachineinstances";

/// Object store client talking to the Kubernetes API server.
///
/// When a [`ClusterCache`] is attached, node, claim and backup lookups are
/// served from it and fall through to the API server on a miss.
#[derive(Clone)]
pub struct KubeVirtClient {
    client: Client,
    cache: Option<ClusterCache>,
}

impl std::fmt::Debug for KubeVirtClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeVirtClient")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

fn namespace_of<K: ResourceExt>(obj: &K, kind: &str) -> Result<String, StoreError> {
    obj.namespace()
        .ok_or_else(|| StoreError::InvalidObject(format!("{} {} has no namespace", kind, obj.name_any())))
}

impl KubeVirtClient {
    pub fn new(client: Client) -> Self {
        Self { client, cache: None }
    }

    /// Serve registry lookups from `cache`
    pub fn with_cache(mut self, cache: ClusterCache) -> Self {
        self.cache = Some(cache);
        self
    }

    async fn get_namespaced<K>(&self, kind: &'static str, namespace: &str, name: &str) -> Result<K, StoreError>
    where
        K: Resource<Scope = k8s_openapi::NamespaceResourceScope> + Clone + DeserializeOwned + std::fmt::Debug,
        K::DynamicType: Default,
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        api.get(name)
            .await
            .map_err(|e| StoreError::from_kube(e, kind, format!("{}/{}", namespace, name)))
    }

    async fn create_namespaced<K>(&self, kind: &'static str, obj: &K) -> Result<K, StoreError>
    where
        K: Resource<Scope = k8s_openapi::NamespaceResourceScope> + Clone + DeserializeOwned + Serialize + std::fmt::Debug,
        K::DynamicType: Default,
    {
        let namespace = namespace_of(obj, kind)?;
        let api: Api<K> = Api::namespaced(self.client.clone(), &namespace);
        let created = api
            .create(&PostParams::default(), obj)
            .await
            .map_err(|e| StoreError::from_kube(e, kind, format!("{}/{}", namespace, obj.name_any())))?;
        debug!("Created {} {}/{}", kind, namespace, created.name_any());
        Ok(created)
    }

    async fn replace_namespaced<K>(&self, kind: &'static str, obj: &K) -> Result<K, StoreError>
    where
        K: Resource<Scope = k8s_openapi::NamespaceResourceScope> + Clone + DeserializeOwned + Serialize + std::fmt::Debug,
        K::DynamicType: Default,
    {
        let namespace = namespace_of(obj, kind)?;
        let name = obj.name_any();
        let api: Api<K> = Api::namespaced(self.client.clone(), &namespace);
        let updated = api
            .replace(&name, &PostParams::default(), obj)
            .await
            .map_err(|e| StoreError::from_kube(e, kind, format!("{}/{}", namespace, name)))?;
        debug!(
            "Replaced {} {}/{} (resourceVersion {:?})",
            kind,
            namespace,
            name,
            updated.resource_version()
        );
        Ok(updated)
    }

    /// PUT to a KubeVirt subresource.
    async fn put_subresource(
        &self,
        resource: &str,
        namespace: &str,
        name: &str,
        subresource: &str,
        body: Vec<u8>,
    ) -> Result<(), StoreError> {
        let url = format!(
            "/apis/{}/{}/namespaces/{}/{}/{}/{}",
            SUBRESOURCE_API_GROUP, SUBRESOURCE_API_VERSION, namespace, resource, name, subresource
        );
        let request = http::Request::put(url)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body)?;
        let kind = if resource == VIRTUAL_MACHINES {
            "VirtualMachine"
        } else {
            "VirtualMachineInstance"
        };
        self.client
            .request_text(request)
            .await
            .map_err(|e| StoreError::from_kube(e, kind, format!("{}/{}", namespace, name)))?;
        debug!("Invoked {} on {} {}/{}", subresource, kind, namespace, name);
        Ok(())
    }
}

#[async_trait::async_trait]
impl KubeVirtClientTrait for KubeVirtClient {
    async fn get_vm(&self, namespace: &str, name: &str) -> Result<VirtualMachine, StoreError> {
        self.get_namespaced("VirtualMachine", namespace, name).await
    }

    async fn update_vm(&self, vm: &VirtualMachine) -> Result<VirtualMachine, StoreError> {
        self.replace_namespaced("VirtualMachine", vm).await
    }

    async fn get_vmi(&self, namespace: &str, name: &str) -> Result<VirtualMachineInstance, StoreError> {
        self.get_namespaced("VirtualMachineInstance", namespace, name).await
    }

    async fn update_vmi(&self, vmi: &VirtualMachineInstance) -> Result<VirtualMachineInstance, StoreError> {
        self.replace_namespaced("VirtualMachineInstance", vmi).await
    }

    async fn list_migrations(&self, namespace: &str) -> Result<Vec<VirtualMachineInstanceMigration>, StoreError> {
        let api: Api<VirtualMachineInstanceMigration> = Api::namespaced(self.client.clone(), namespace);
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|e| StoreError::from_kube(e, "VirtualMachineInstanceMigration", namespace))?;
        Ok(list.items)
    }

    async fn create_migration(&self, migration: &VirtualMachineInstanceMigration) -> Result<VirtualMachineInstanceMigration, StoreError> {
        self.create_namespaced("VirtualMachineInstanceMigration", migration).await
    }

    async fn delete_migration(&self, namespace: &str, name: &str) -> Result<(), StoreError> {
        let api: Api<VirtualMachineInstanceMigration> = Api::namespaced(self.client.clone(), namespace);
        api.delete(name, &DeleteParams::default())
            .await
            .map_err(|e| {
                StoreError::from_kube(e, "VirtualMachineInstanceMigration", format!("{}/{}", namespace, name))
            })?;
        debug!("Deleted VirtualMachineInstanceMigration {}/{}", namespace, name);
        Ok(())
    }

    async fn get_node(&self, name: &str) -> Result<Node, StoreError> {
        if let Some(node) = self.cache.as_ref().and_then(|c| c.node(name)) {
            return Ok((*node).clone());
        }
        let api: Api<Node> = Api::all(self.client.clone());
        api.get(name)
            .await
            .map_err(|e| StoreError::from_kube(e, "Node", name))
    }

    async fn get_claim(&self, namespace: &str, name: &str) -> Result<PersistentVolumeClaim, StoreError> {
        if let Some(claim) = self.cache.as_ref().and_then(|c| c.claim(namespace, name)) {
            return Ok((*claim).clone());
        }
        self.get_namespaced("PersistentVolumeClaim", namespace, name).await
    }

    async fn get_backup(&self, namespace: &str, name: &str) -> Result<VirtualMachineBackup, StoreError> {
        if let Some(backup) = self.cache.as_ref().and_then(|c| c.backup(namespace, name)) {
            return Ok((*backup).clone());
        }
        self.get_namespaced("VirtualMachineBackup", namespace, name).await
    }

    async fn create_backup(&self, backup: &VirtualMachineBackup) -> Result<VirtualMachineBackup, StoreError> {
        self.create_namespaced("VirtualMachineBackup", backup).await
    }

    async fn create_restore(&self, restore: &VirtualMachineRestore) -> Result<VirtualMachineRestore, StoreError> {
        self.create_namespaced("VirtualMachineRestore", restore).await
    }

    async fn create_template(&self, template: &VirtualMachineTemplate) -> Result<VirtualMachineTemplate, StoreError> {
        self.create_namespaced("VirtualMachineTemplate", template).await
    }

    async fn create_template_version(&self, version: &VirtualMachineTemplateVersion) -> Result<VirtualMachineTemplateVersion, StoreError> {
        self.create_namespaced("VirtualMachineTemplateVersion", version).await
    }

    async fn get_setting(&self, name: &str) -> Result<Setting, StoreError> {
        let gvk = GroupVersionKind::gvk(HARVESTER_API_GROUP, HARVESTER_API_VERSION, SETTING_KIND);
        let api: Api<DynamicObject> = Api::all_with(self.client.clone(), &ApiResource::from_gvk(&gvk));
        let obj = api
            .get(name)
            .await
            .map_err(|e| StoreError::from_kube(e, "Setting", name))?;
        Ok(serde_json::from_value(serde_json::to_value(obj)?)?)
    }

    async fn create_backing_image(&self, image: &BackingImage) -> Result<BackingImage, StoreError> {
        self.create_namespaced("BackingImage", image).await
    }

    async fn vm_subresource(&self, namespace: &str, name: &str, operation: VmOperation) -> Result<(), StoreError> {
        self.put_subresource(VIRTUAL_MACHINES, namespace, name, operation.as_str(), Vec::new())
            .await
    }

    async fn vmi_subresource(&self, namespace: &str, name: &str, operation: VmiOperation) -> Result<(), StoreError> {
        self.put_subresource(VIRTUAL_MACHINE_INSTANCES, namespace, name, operation.as_str(), Vec::new())
            .await
    }

    async fn add_volume(&self, namespace: &str, name: &str, options: &AddVolumeOptions) -> Result<(), StoreError> {
        let body = serde_json::to_vec(options)?;
        self.put_subresource(VIRTUAL_MACHINES, namespace, name, ADD_VOLUME_SUBRESOURCE, body)
            .await
    }

    async fn remove_volume(&self, namespace: &str, name: &str, options: &RemoveVolumeOptions) -> Result<(), StoreError> {
        let body = serde_json::to_vec(options)?;
        self.put_subresource(VIRTUAL_MACHINES, namespace, name, REMOVE_VOLUME_SUBRESOURCE, body)
            .await
    }
}
