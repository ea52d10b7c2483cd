//! Pure state transforms.
//!
//! Each function takes a snapshot by reference and returns a new value. The
//! orchestrator compares the result with the snapshot to decide whether a
//! write is needed.

use crate::action::{AddVolumeInput, RemoveVolumeInput};
use crate::annotations::drop_claim_volumes;
use crate::error::ActionError;
use crds::{
    ANNOTATION_MIGRATION_TARGET, ANNOTATION_VOLUME_CLAIM_TEMPLATES, AddVolumeOptions, Disk,
    DiskTarget, HotplugVolumeSource, LABEL_HOSTNAME, PersistentVolumeClaimVolumeSource,
    RemoveVolumeOptions, VirtualMachine, VirtualMachineInstance, VirtualMachineSourceSpec,
    VirtualMachineSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Only SCSI is supported for hot-plugged disks
pub const HOTPLUG_DISK_BUS: &str = "scsi";

/// Remove the named disks, their claim-backed volumes and the matching
/// claim templates.
///
/// Disk names are expected to have been validated as CD-ROMs. The claim
/// template annotation is rewritten only when present.
pub fn eject_cdroms(vm: &VirtualMachine, disk_names: &[String]) -> Result<VirtualMachine, ActionError> {
    let mut ejected = vm.clone();
    let template = &mut ejected.spec.template.spec;

    template
        .domain
        .devices
        .disks
        .retain(|disk| !disk_names.contains(&disk.name));

    let claim_templates = vm
        .metadata
        .annotations
        .as_ref()
        .and_then(|a| a.get(ANNOTATION_VOLUME_CLAIM_TEMPLATES))
        .map(String::as_str);
    let synced = drop_claim_volumes(&template.volumes, claim_templates, disk_names)?;
    template.volumes = synced.volumes;

    if let Some(encoded) = synced.claim_templates {
        ejected
            .metadata
            .annotations
            .get_or_insert_with(Default::default)
            .insert(ANNOTATION_VOLUME_CLAIM_TEMPLATES.to_string(), encoded);
    }

    Ok(ejected)
}

/// Constrain the instance to `node` and record the requested target.
///
/// Must be written before the migration is created; the scheduler reads the
/// node selector when it places the migration target.
pub fn pin_migration_target(vmi: &VirtualMachineInstance, node: &str) -> VirtualMachineInstance {
    let mut pinned = vmi.clone();
    pinned
        .metadata
        .annotations
        .get_or_insert_with(Default::default)
        .insert(ANNOTATION_MIGRATION_TARGET.to_string(), node.to_string());
    pinned
        .spec
        .node_selector
        .get_or_insert_with(Default::default)
        .insert(LABEL_HOSTNAME.to_string(), node.to_string());
    pinned
}

/// Copy of `spec` with every interface hardware address cleared
pub fn strip_mac_addresses(spec: &VirtualMachineSpec) -> VirtualMachineSpec {
    let mut stripped = spec.clone();
    for interface in &mut stripped.template.spec.domain.devices.interfaces {
        interface.mac_address = None;
    }
    stripped
}

/// VM object embedded into a template version.
///
/// Only name, labels and annotations survive from the source metadata;
/// identity and bookkeeping fields of the live object must not be stamped
/// into new machines.
pub fn template_source(vm: &VirtualMachine) -> VirtualMachineSourceSpec {
    VirtualMachineSourceSpec {
        metadata: ObjectMeta {
            name: vm.metadata.name.clone(),
            labels: vm.metadata.labels.clone(),
            annotations: vm.metadata.annotations.clone(),
            ..Default::default()
        },
        spec: strip_mac_addresses(&vm.spec),
    }
}

pub fn add_volume_options(input: &AddVolumeInput) -> AddVolumeOptions {
    AddVolumeOptions {
        name: input.disk_name.clone(),
        disk: Disk {
            name: input.disk_name.clone(),
            disk: Some(DiskTarget {
                bus: Some(HOTPLUG_DISK_BUS.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        },
        volume_source: HotplugVolumeSource {
            persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                claim_name: input.volume_source_name.clone(),
                read_only: None,
                hotpluggable: Some(true),
            }),
        },
    }
}

pub fn remove_volume_options(input: &RemoveVolumeInput) -> RemoveVolumeOptions {
    RemoveVolumeOptions {
        name: input.disk_name.clone(),
    }
}
