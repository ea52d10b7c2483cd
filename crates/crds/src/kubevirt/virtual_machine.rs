//! VirtualMachine CRD
//!
//! The declarative VM object. Its `spec.template` describes the instance that
//! KubeVirt starts; disks, interfaces and volumes live under it.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::instance::VirtualMachineInstanceSpec;

/// Desired state of a VirtualMachine
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "kubevirt.io",
    version = "v1",
    kind = "VirtualMachine",
    namespaced,
    status = "VirtualMachineStatus",
    shortname = "vm",
    schema = "disabled",
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineSpec {
    /// Legacy start/stop switch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,

    /// Run strategy (Always, Halted, Manual, RerunOnFailure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_strategy: Option<String>,

    /// Template of the instance started for this VM
    #[serde(default)]
    pub template: VirtualMachineInstanceTemplateSpec,

    /// Fields not modelled here, preserved on write
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Instance template embedded in a VM
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineInstanceTemplateSpec {
    /// Metadata copied to the instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,

    /// Spec copied to the instance
    #[serde(default)]
    pub spec: VirtualMachineInstanceSpec,
}

/// Observed state of a VirtualMachine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineStatus {
    /// An instance exists for this VM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<bool>,

    /// The instance is up and ready
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready: Option<bool>,

    /// Human readable status (Running, Stopped, Migrating, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printable_status: Option<String>,

    /// Fields not modelled here, preserved on write
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Virtual hardware of an instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSpec {
    /// Attached devices
    #[serde(default)]
    pub devices: Devices,

    /// Fields not modelled here, preserved on write
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Device list of a domain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Devices {
    /// Disks, each bound to a volume of the same name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disks: Vec<Disk>,

    /// Network interfaces
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<Interface>,

    /// Fields not modelled here, preserved on write
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A disk attached to the domain.
///
/// Exactly one of `disk` or `cdrom` is normally set; the `cdrom` target is what
/// marks a disk as ejectable media.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disk {
    /// Disk name, matching a volume
    pub name: String,

    /// Set for a regular disk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<DiskTarget>,

    /// Set for a CD-ROM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdrom: Option<CdRomTarget>,

    /// Boot priority, lowest first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot_order: Option<u32>,

    /// Fields not modelled here, preserved on write
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Disk {
    /// Whether this disk is a CD-ROM device
    pub fn is_cdrom(&self) -> bool {
        self.cdrom.is_some()
    }
}

/// Regular disk device settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskTarget {
    /// Bus type (virtio, sata, scsi)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus: Option<String>,

    /// Expose the disk read-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readonly: Option<bool>,

    /// Fixed PCI address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pci_address: Option<String>,
}

/// CD-ROM device settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdRomTarget {
    /// Bus type (sata, scsi)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus: Option<String>,

    /// Expose the media read-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readonly: Option<bool>,

    /// Tray state (open, closed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tray: Option<String>,
}

/// A network interface of the domain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interface {
    /// Interface name, matching a network
    pub name: String,

    /// Hardware address; unique per interface across the cluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,

    /// NIC model (virtio, e1000)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Fields not modelled here, preserved on write
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A volume source bound to a disk of the same name.
///
/// Only claim-backed volumes are modelled; other sources (containerDisk,
/// cloudInitNoCloud, dataVolume, ...) are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// Volume name, matching a disk
    pub name: String,

    /// Set when the volume is backed by a claim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_volume_claim: Option<PersistentVolumeClaimVolumeSource>,

    /// Fields not modelled here, preserved on write
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Volume {
    /// Claim name when the volume is backed by a PersistentVolumeClaim
    pub fn claim_name(&self) -> Option<&str> {
        self.persistent_volume_claim
            .as_ref()
            .map(|pvc| pvc.claim_name.as_str())
    }
}

/// Claim-backed volume source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentVolumeClaimVolumeSource {
    /// Claim in the VM namespace
    pub claim_name: String,

    /// Mount the claim read-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    /// Marks the volume as hot-pluggable into a running instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotpluggable: Option<bool>,
}

impl VirtualMachine {
    /// Disks of the instance template
    pub fn disks(&self) -> &[Disk] {
        &self.spec.template.spec.domain.devices.disks
    }

    /// Volumes of the instance template
    pub fn volumes(&self) -> &[Volume] {
        &self.spec.template.spec.volumes
    }

    /// Annotations on the instance template metadata
    pub fn template_annotations(&self) -> Option<&BTreeMap<String, String>> {
        self.spec
            .template
            .metadata
            .as_ref()
            .and_then(|meta| meta.annotations.as_ref())
    }
}
