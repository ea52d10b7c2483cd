//! VirtualMachineBackup and VirtualMachineRestore CRDs
//!
//! One-shot requests. Their progress is owned by Harvester's backup
//! controller; the action server only creates them.

use kube::CustomResource;
use serde::{Deserialize, Serialize};

use crate::references::TypedLocalObjectReference;

/// Request to back up a single VirtualMachine
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "harvesterhci.io",
    version = "v1beta1",
    kind = "VirtualMachineBackup",
    namespaced,
    status = "VirtualMachineBackupStatus",
    shortname = "vmbackup",
    schema = "disabled",
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineBackupSpec {
    /// The VirtualMachine being backed up
    pub source: TypedLocalObjectReference,
}

/// Backup progress reported by Harvester
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineBackupStatus {
    /// Set once the backup can be restored from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_to_use: Option<bool>,

    /// When the backup content was captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<chrono::DateTime<chrono::Utc>>,

    /// Error message if the backup failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<BackupError>,
}

/// Failure detail attached to a backup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupError {
    /// Human readable error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Request to restore a VirtualMachine from a backup
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "harvesterhci.io",
    version = "v1beta1",
    kind = "VirtualMachineRestore",
    namespaced,
    status = "VirtualMachineRestoreStatus",
    shortname = "vmrestore",
    schema = "disabled",
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineRestoreSpec {
    /// The VirtualMachine to restore into
    pub target: TypedLocalObjectReference,

    /// Name of the VirtualMachineBackup to restore from (same namespace)
    pub virtual_machine_backup_name: String,

    /// Restore into a new VM instead of replacing the target
    #[serde(rename = "newVM", default)]
    pub new_vm: bool,
}

/// Restore progress reported by Harvester
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineRestoreStatus {
    /// Set once the restore has finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,

    /// When the restore finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_time: Option<chrono::DateTime<chrono::Utc>>,
}
