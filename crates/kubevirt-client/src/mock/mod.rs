//! Mock KubeVirtClient for unit testing
//!
//! This module provides an in-memory implementation of KubeVirtClientTrait
//! that can be used in unit tests without a Kubernetes API server.
//!
//! The mock is organized into:
//! - `store.rs` - generic object store with resource versions and generateName
//! - `subresources.rs` - subresource call recording and failure injection

mod store;
mod subresources;

use crate::error::StoreError;
use crate::kubevirt_trait::KubeVirtClientTrait;
use crds::{
    ADD_VOLUME_SUBRESOURCE, AddVolumeOptions, BackingImage, REMOVE_VOLUME_SUBRESOURCE,
    RemoveVolumeOptions, Setting, VirtualMachine, VirtualMachineBackup, VirtualMachineInstance,
    VirtualMachineInstanceMigration, VirtualMachineRestore, VirtualMachineTemplate,
    VirtualMachineTemplateVersion, VmOperation, VmiOperation,
};
use k8s_openapi::api::core::v1::{Node, PersistentVolumeClaim};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use store::{ObjectStore, Sequence};
use subresources::{CallLog, FailurePlan, InjectedFailure};

pub use subresources::SubresourceCall;

const VIRTUAL_MACHINES: &str = "virtualmachines";
const VIRTUAL_MACHINE_INSTANCES: &str = "virtualmachineinstances";

/// Mock KubeVirtClient for testing
///
/// Stores objects in memory, records subresource calls and can be told to
/// fail individual operations to exercise error paths.
#[derive(Clone)]
pub struct MockKubeVirtClient {
    vms: ObjectStore<VirtualMachine>,
    vmis: ObjectStore<VirtualMachineInstance>,
    migrations: ObjectStore<VirtualMachineInstanceMigration>,
    nodes: ObjectStore<Node>,
    claims: ObjectStore<PersistentVolumeClaim>,
    backups: ObjectStore<VirtualMachineBackup>,
    restores: ObjectStore<VirtualMachineRestore>,
    templates: ObjectStore<VirtualMachineTemplate>,
    template_versions: ObjectStore<VirtualMachineTemplateVersion>,
    backing_images: ObjectStore<BackingImage>,
    // Settings are not typed resources, so they get a plain map
    settings: Arc<Mutex<HashMap<String, Setting>>>,
    calls: CallLog,
    failures: FailurePlan,
}

impl std::fmt::Debug for MockKubeVirtClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockKubeVirtClient")
            .field("subresource_calls", &self.calls.snapshot().len())
            .finish_non_exhaustive()
    }
}

impl Default for MockKubeVirtClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockKubeVirtClient {
    /// Create an empty mock client
    pub fn new() -> Self {
        let sequence = Arc::new(Sequence::default());
        Self {
            vms: ObjectStore::new("VirtualMachine", Arc::clone(&sequence)),
            vmis: ObjectStore::new("VirtualMachineInstance", Arc::clone(&sequence)),
            migrations: ObjectStore::new("VirtualMachineInstanceMigration", Arc::clone(&sequence)),
            nodes: ObjectStore::new("Node", Arc::clone(&sequence)),
            claims: ObjectStore::new("PersistentVolumeClaim", Arc::clone(&sequence)),
            backups: ObjectStore::new("VirtualMachineBackup", Arc::clone(&sequence)),
            restores: ObjectStore::new("VirtualMachineRestore", Arc::clone(&sequence)),
            templates: ObjectStore::new("VirtualMachineTemplate", Arc::clone(&sequence)),
            template_versions: ObjectStore::new("VirtualMachineTemplateVersion", Arc::clone(&sequence)),
            backing_images: ObjectStore::new("BackingImage", sequence),
            settings: Arc::new(Mutex::new(HashMap::new())),
            calls: CallLog::default(),
            failures: FailurePlan::default(),
        }
    }

    // Test setup

    /// Add a VirtualMachine to the mock store (for test setup)
    pub fn add_vm(&self, vm: VirtualMachine) {
        self.vms.insert(vm);
    }

    /// Add a VirtualMachineInstance to the mock store (for test setup)
    pub fn add_vmi(&self, vmi: VirtualMachineInstance) {
        self.vmis.insert(vmi);
    }

    /// Add a migration to the mock store (for test setup)
    pub fn add_migration(&self, migration: VirtualMachineInstanceMigration) {
        self.migrations.insert(migration);
    }

    /// Add a cluster node to the mock store (for test setup)
    pub fn add_node(&self, node: Node) {
        self.nodes.insert(node);
    }

    /// Add a PersistentVolumeClaim to the mock store (for test setup)
    pub fn add_claim(&self, claim: PersistentVolumeClaim) {
        self.claims.insert(claim);
    }

    /// Add a VirtualMachineBackup to the mock store (for test setup)
    pub fn add_backup(&self, backup: VirtualMachineBackup) {
        self.backups.insert(backup);
    }

    /// Add a Harvester setting to the mock store (for test setup)
    pub fn add_setting(&self, setting: Setting) {
        let name = setting.metadata.name.clone().unwrap_or_default();
        self.settings.lock().unwrap().insert(name, setting);
    }

    /// Make `operation` fail with a server error.
    ///
    /// `operation` is a trait method name (`update_vm`) or a subresource
    /// path segment (`restart`).
    pub fn fail_on(&self, operation: &str) {
        self.failures.set(operation, InjectedFailure::ServerError);
    }

    /// Make `operation` fail with a resource version conflict
    pub fn conflict_on(&self, operation: &str) {
        self.failures.set(operation, InjectedFailure::Conflict);
    }

    /// Remove all injected failures
    pub fn clear_failures(&self) {
        self.failures.clear();
    }

    // Inspection

    pub fn vm(&self, namespace: &str, name: &str) -> Option<VirtualMachine> {
        self.vms.find(namespace, name)
    }

    pub fn vmi(&self, namespace: &str, name: &str) -> Option<VirtualMachineInstance> {
        self.vmis.find(namespace, name)
    }

    pub fn migrations(&self, namespace: &str) -> Vec<VirtualMachineInstanceMigration> {
        self.migrations.list(namespace)
    }

    pub fn backups(&self, namespace: &str) -> Vec<VirtualMachineBackup> {
        self.backups.list(namespace)
    }

    pub fn restores(&self, namespace: &str) -> Vec<VirtualMachineRestore> {
        self.restores.list(namespace)
    }

    pub fn templates(&self, namespace: &str) -> Vec<VirtualMachineTemplate> {
        self.templates.list(namespace)
    }

    pub fn template_versions(&self, namespace: &str) -> Vec<VirtualMachineTemplateVersion> {
        self.template_versions.list(namespace)
    }

    /// Backing images across all namespaces
    pub fn backing_images(&self) -> Vec<BackingImage> {
        self.backing_images.all()
    }

    /// Subresource calls in the order they were made, including failed ones
    pub fn subresource_calls(&self) -> Vec<SubresourceCall> {
        self.calls.snapshot()
    }

    fn record(
        &self,
        resource: &str,
        namespace: &str,
        name: &str,
        subresource: &str,
        body: Option<serde_json::Value>,
    ) -> Result<(), StoreError> {
        self.calls.record(SubresourceCall {
            resource: resource.to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
            subresource: subresource.to_string(),
            body,
        });
        self.failures.check(subresource)
    }
}

#[async_trait::async_trait]
impl KubeVirtClientTrait for MockKubeVirtClient {
    async fn get_vm(&self, namespace: &str, name: &str) -> Result<VirtualMachine, StoreError> {
        self.failures.check("get_vm")?;
        self.vms.get(namespace, name)
    }

    async fn update_vm(&self, vm: &VirtualMachine) -> Result<VirtualMachine, StoreError> {
        self.failures.check("update_vm")?;
        self.vms.replace(vm)
    }

    async fn get_vmi(&self, namespace: &str, name: &str) -> Result<VirtualMachineInstance, StoreError> {
        self.failures.check("get_vmi")?;
        self.vmis.get(namespace, name)
    }

    async fn update_vmi(&self, vmi: &VirtualMachineInstance) -> Result<VirtualMachineInstance, StoreError> {
        self.failures.check("update_vmi")?;
        self.vmis.replace(vmi)
    }

    async fn list_migrations(&self, namespace: &str) -> Result<Vec<VirtualMachineInstanceMigration>, StoreError> {
        self.failures.check("list_migrations")?;
        Ok(self.migrations.list(namespace))
    }

    async fn create_migration(&self, migration: &VirtualMachineInstanceMigration) -> Result<VirtualMachineInstanceMigration, StoreError> {
        self.failures.check("create_migration")?;
        self.migrations.create(migration)
    }

    async fn delete_migration(&self, namespace: &str, name: &str) -> Result<(), StoreError> {
        self.failures.check("delete_migration")?;
        self.migrations.delete(namespace, name)
    }

    async fn get_node(&self, name: &str) -> Result<Node, StoreError> {
        self.failures.check("get_node")?;
        self.nodes.get("", name)
    }

    async fn get_claim(&self, namespace: &str, name: &str) -> Result<PersistentVolumeClaim, StoreError> {
        self.failures.check("get_claim")?;
        self.claims.get(namespace, name)
    }

    async fn get_backup(&self, namespace: &str, name: &str) -> Result<VirtualMachineBackup, StoreError> {
        self.failures.check("get_backup")?;
        self.backups.get(namespace, name)
    }

    async fn create_backup(&self, backup: &VirtualMachineBackup) -> Result<VirtualMachineBackup, StoreError> {
        self.failures.check("create_backup")?;
        self.backups.create(backup)
    }

    async fn create_restore(&self, restore: &VirtualMachineRestore) -> Result<VirtualMachineRestore, StoreError> {
        self.failures.check("create_restore")?;
        self.restores.create(restore)
    }

    async fn create_template(&self, template: &VirtualMachineTemplate) -> Result<VirtualMachineTemplate, StoreError> {
        self.failures.check("create_template")?;
        self.templates.create(template)
    }

    async fn create_template_version(&self, version: &VirtualMachineTemplateVersion) -> Result<VirtualMachineTemplateVersion, StoreError> {
        self.failures.check("create_template_version")?;
        self.template_versions.create(version)
    }

    async fn get_setting(&self, name: &str) -> Result<Setting, StoreError> {
        self.failures.check("get_setting")?;
        self.settings
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Setting", name))
    }

    async fn create_backing_image(&self, image: &BackingImage) -> Result<BackingImage, StoreError> {
        self.failures.check("create_backing_image")?;
        self.backing_images.create(image)
    }

    async fn vm_subresource(&self, namespace: &str, name: &str, operation: VmOperation) -> Result<(), StoreError> {
        self.vms.get(namespace, name)?;
        self.record(VIRTUAL_MACHINES, namespace, name, operation.as_str(), None)
    }

    async fn vmi_subresource(&self, namespace: &str, name: &str, operation: VmiOperation) -> Result<(), StoreError> {
        self.vmis.get(namespace, name)?;
        self.record(VIRTUAL_MACHINE_INSTANCES, namespace, name, operation.as_str(), None)
    }

    async fn add_volume(&self, namespace: &str, name: &str, options: &AddVolumeOptions) -> Result<(), StoreError> {
        self.vms.get(namespace, name)?;
        let body = serde_json::to_value(options)?;
        self.record(VIRTUAL_MACHINES, namespace, name, ADD_VOLUME_SUBRESOURCE, Some(body))
    }

    async fn remove_volume(&self, namespace: &str, name: &str, options: &RemoveVolumeOptions) -> Result<(), StoreError> {
        self.vms.get(namespace, name)?;
        let body = serde_json::to_value(options)?;
        self.record(VIRTUAL_MACHINES, namespace, name, REMOVE_VOLUME_SUBRESOURCE, Some(body))
    }
}
