//! KubeVirtClient trait for mocking
//!
//! This trait abstracts the object store so the action handlers can run
//! against the real kube-rs client or an in-memory mock.

use crate::error::StoreError;
use crds::{
    AddVolumeOptions, BackingImage, RemoveVolumeOptions, Setting, VirtualMachine,
    VirtualMachineBackup, VirtualMachineInstance, VirtualMachineInstanceMigration,
    VirtualMachineRestore, VirtualMachineTemplate, VirtualMachineTemplateVersion, VmOperation,
    VmiOperation,
};
use k8s_openapi::api::core::v1::{Node, PersistentVolumeClaim};

/// Trait for object store operations used by the VM action server
///
/// Updates are replace operations that carry the resource version of the
/// object passed in; a stale version yields [`StoreError::Conflict`].
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait KubeVirtClientTrait: Send + Sync {
    // KubeVirt objects
    async fn get_vm(&self, namespace: &str, name: &str) -> Result<VirtualMachine, StoreError>;
    async fn update_vm(&self, vm: &VirtualMachine) -> Result<VirtualMachine, StoreError>;
    async fn get_vmi(&self, namespace: &str, name: &str) -> Result<VirtualMachineInstance, StoreError>;
    async fn update_vmi(&self, vmi: &VirtualMachineInstance) -> Result<VirtualMachineInstance, StoreError>;
    async fn list_migrations(&self, namespace: &str) -> Result<Vec<VirtualMachineInstanceMigration>, StoreError>;
    async fn create_migration(&self, migration: &VirtualMachineInstanceMigration) -> Result<VirtualMachineInstanceMigration, StoreError>;
    async fn delete_migration(&self, namespace: &str, name: &str) -> Result<(), StoreError>;

    // Cluster registries
    async fn get_node(&self, name: &str) -> Result<Node, StoreError>;
    async fn get_claim(&self, namespace: &str, name: &str) -> Result<PersistentVolumeClaim, StoreError>;

    // Harvester objects
    async fn get_backup(&self, namespace: &str, name: &str) -> Result<VirtualMachineBackup, StoreError>;
    async fn create_backup(&self, backup: &VirtualMachineBackup) -> Result<VirtualMachineBackup, StoreError>;
    async fn create_restore(&self, restore: &VirtualMachineRestore) -> Result<VirtualMachineRestore, StoreError>;
    async fn create_template(&self, template: &VirtualMachineTemplate) -> Result<VirtualMachineTemplate, StoreError>;
    async fn create_template_version(&self, version: &VirtualMachineTemplateVersion) -> Result<VirtualMachineTemplateVersion, StoreError>;
    async fn get_setting(&self, name: &str) -> Result<Setting, StoreError>;

    // Longhorn objects
    async fn create_backing_image(&self, image: &BackingImage) -> Result<BackingImage, StoreError>;

    // Subresources
    async fn vm_subresource(&self, namespace: &str, name: &str, operation: VmOperation) -> Result<(), StoreError>;
    async fn vmi_subresource(&self, namespace: &str, name: &str, operation: VmiOperation) -> Result<(), StoreError>;
    async fn add_volume(&self, namespace: &str, name: &str, options: &AddVolumeOptions) -> Result<(), StoreError>;
    async fn remove_volume(&self, namespace: &str, name: &str, options: &RemoveVolumeOptions) -> Result<(), StoreError>;
}
