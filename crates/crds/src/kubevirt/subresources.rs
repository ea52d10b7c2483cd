//! KubeVirt subresource operations and payloads
//!
//! Subresources live under the `subresources.kubevirt.io` API group and are
//! invoked with PUT requests rather than full object replacement.

use serde::{Deserialize, Serialize};

use super::virtual_machine::{Disk, PersistentVolumeClaimVolumeSource};

/// API group serving KubeVirt subresources
pub const SUBRESOURCE_API_GROUP: &str = "subresources.kubevirt.io";

/// API version serving KubeVirt subresources
pub const SUBRESOURCE_API_VERSION: &str = "v1";

/// Subresource hot-plugging a volume into a running VM
pub const ADD_VOLUME_SUBRESOURCE: &str = "addvolume";

/// Subresource hot-unplugging a volume from a running VM
pub const REMOVE_VOLUME_SUBRESOURCE: &str = "removevolume";

/// Body-less subresource operations on a VirtualMachine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VmOperation {
    /// Start a stopped VM
    Start,
    /// Stop a running VM
    Stop,
    /// Stop and start again
    Restart,
}

impl VmOperation {
    /// Path segment of the subresource
    pub fn as_str(self) -> &'static str {
        match self {
            VmOperation::Start => "start",
            VmOperation::Stop => "stop",
            VmOperation::Restart => "restart",
        }
    }
}

/// Subresource operations on a VirtualMachineInstance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VmiOperation {
    /// Freeze the running domain
    Pause,
    /// Resume a paused domain
    Unpause,
}

impl VmiOperation {
    /// Path segment of the subresource
    pub fn as_str(self) -> &'static str {
        match self {
            VmiOperation::Pause => "pause",
            VmiOperation::Unpause => "unpause",
        }
    }
}

/// Body of the `addvolume` subresource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddVolumeOptions {
    /// Name shared by the new disk and volume
    pub name: String,

    /// Disk device to add
    pub disk: Disk,

    /// Source of the volume behind the disk
    pub volume_source: HotplugVolumeSource,
}

/// Volume source accepted by `addvolume`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotplugVolumeSource {
    /// Claim to attach
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_volume_claim: Option<PersistentVolumeClaimVolumeSource>,
}

/// Body of the `removevolume` subresource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveVolumeOptions {
    /// Volume to detach
    pub name: String,
}
