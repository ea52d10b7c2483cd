//! Builders for the request objects actions create.

use crate::action::{CreateTemplateInput, RestoreInput};
use crds::{
    BackingImage, BackingImageSpec, DATA_SOURCE_EXPORT_FROM_VOLUME, EXPORT_PARAMETER_EXPORT_TYPE,
    EXPORT_PARAMETER_VOLUME_NAME, EXPORT_TYPE_RAW, LONGHORN_SYSTEM_NAMESPACE,
    TypedLocalObjectReference, VirtualMachineBackup, VirtualMachineBackupSpec,
    VirtualMachineInstanceMigration, VirtualMachineInstanceMigrationSpec, VirtualMachineRestore,
    VirtualMachineRestoreSpec, VirtualMachineSourceSpec, VirtualMachineTemplate,
    VirtualMachineTemplateSpec, VirtualMachineTemplateVersion, VirtualMachineTemplateVersionSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

fn named(namespace: &str, name: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        ..Default::default()
    }
}

fn generated(namespace: &str, prefix: &str) -> ObjectMeta {
    ObjectMeta {
        generate_name: Some(format!("{}-", prefix)),
        namespace: Some(namespace.to_string()),
        ..Default::default()
    }
}

/// Live migration of the instance backing `vm_name`
pub fn migration(namespace: &str, vm_name: &str) -> VirtualMachineInstanceMigration {
    VirtualMachineInstanceMigration {
        metadata: generated(namespace, vm_name),
        spec: VirtualMachineInstanceMigrationSpec {
            vmi_name: vm_name.to_string(),
        },
        status: None,
    }
}

pub fn backup(namespace: &str, vm_name: &str, backup_name: &str) -> VirtualMachineBackup {
    VirtualMachineBackup {
        metadata: named(namespace, backup_name),
        spec: VirtualMachineBackupSpec {
            source: TypedLocalObjectReference::virtual_machine(vm_name),
        },
        status: None,
    }
}

/// In-place restore of `vm_name` from an existing backup
pub fn restore(namespace: &str, vm_name: &str, input: &RestoreInput) -> VirtualMachineRestore {
    VirtualMachineRestore {
        metadata: named(namespace, &input.name),
        spec: VirtualMachineRestoreSpec {
            target: TypedLocalObjectReference::virtual_machine(vm_name),
            virtual_machine_backup_name: input.backup_name.clone(),
            new_vm: false,
        },
        status: None,
    }
}

pub fn template(namespace: &str, input: &CreateTemplateInput) -> VirtualMachineTemplate {
    VirtualMachineTemplate {
        metadata: named(namespace, &input.name),
        spec: VirtualMachineTemplateSpec {
            description: input.description.clone(),
            default_version_id: None,
        },
        status: None,
    }
}

/// First version of `template_name`, stamped from `vm_name`
pub fn template_version(
    namespace: &str,
    template_name: &str,
    vm_name: &str,
    vm: VirtualMachineSourceSpec,
    key_pair_ids: Vec<String>,
) -> VirtualMachineTemplateVersion {
    VirtualMachineTemplateVersion {
        metadata: generated(namespace, template_name),
        spec: VirtualMachineTemplateVersionSpec {
            template_id: format!("{}/{}", namespace, template_name),
            description: format!(
                "Template derived from virtual machine [{}/{}]",
                namespace, vm_name
            ),
            key_pair_ids,
            vm,
        },
        status: None,
    }
}

/// Raw export of a Longhorn volume as a backing image of the same name
pub fn volume_export(volume_name: &str) -> BackingImage {
    let source_parameters = BTreeMap::from([
        (EXPORT_PARAMETER_VOLUME_NAME.to_string(), volume_name.to_string()),
        (EXPORT_PARAMETER_EXPORT_TYPE.to_string(), EXPORT_TYPE_RAW.to_string()),
    ]);
    BackingImage {
        metadata: named(LONGHORN_SYSTEM_NAMESPACE, volume_name),
        spec: BackingImageSpec {
            disks: BTreeMap::new(),
            source_type: DATA_SOURCE_EXPORT_FROM_VOLUME.to_string(),
            source_parameters,
        },
    }
}
