//! Test utilities for unit testing actions
//!
//! This module provides helpers for creating test objects and an orchestrator
//! wired to the in-memory mock client.

use crate::backup_target::StaticBackupTarget;
use crate::orchestrator::ActionOrchestrator;
use crds::*;
use k8s_openapi::api::core::v1::{Node, PersistentVolumeClaim, PersistentVolumeClaimSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kubevirt_client::MockKubeVirtClient;
use std::collections::BTreeMap;
use std::sync::Arc;

fn meta(namespace: &str, name: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        ..Default::default()
    }
}

/// Claim name backing `disk` of `vm`
pub fn claim_name(vm: &str, disk: &str) -> String {
    format!("{}-{}", vm, disk)
}

/// Helper to create a test VirtualMachine.
///
/// Each `(disk, cdrom)` entry gets a disk of that kind, a claim-backed volume
/// and a claim template in the VM annotation.
pub fn create_test_vm(namespace: &str, name: &str, disks: &[(&str, bool)]) -> VirtualMachine {
    let mut spec = VirtualMachineSpec {
        run_strategy: Some("RerunOnFailure".to_string()),
        ..Default::default()
    };
    let mut claim_templates = Vec::new();

    for (disk_name, cdrom) in disks {
        let claim = claim_name(name, disk_name);
        let disk = if *cdrom {
            Disk {
                name: disk_name.to_string(),
                cdrom: Some(CdRomTarget {
                    bus: Some("sata".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            }
        } else {
            Disk {
                name: disk_name.to_string(),
                disk: Some(DiskTarget {
                    bus: Some("virtio".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            }
        };
        spec.template.spec.domain.devices.disks.push(disk);
        spec.template.spec.volumes.push(Volume {
            name: disk_name.to_string(),
            persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                claim_name: claim.clone(),
                read_only: None,
                hotpluggable: None,
            }),
            extra: BTreeMap::new(),
        });
        claim_templates.push(PersistentVolumeClaim {
            metadata: ObjectMeta {
                name: Some(claim),
                ..Default::default()
            },
            ..Default::default()
        });
    }

    spec.template.spec.domain.devices.interfaces.push(Interface {
        name: "default".to_string(),
        mac_address: Some("52:54:00:12:34:56".to_string()),
        model: Some("virtio".to_string()),
        extra: BTreeMap::new(),
    });

    let mut metadata = meta(namespace, name);
    metadata.uid = Some(format!("uid-{}", name));
    metadata.labels = Some(BTreeMap::from([("app".to_string(), name.to_string())]));
    metadata.annotations = Some(BTreeMap::from([(
        ANNOTATION_VOLUME_CLAIM_TEMPLATES.to_string(),
        serde_json::to_string(&claim_templates).unwrap(),
    )]));

    VirtualMachine {
        metadata,
        spec,
        status: None,
    }
}

/// Set the SSH key annotation on the VM's instance template
pub fn with_ssh_names(mut vm: VirtualMachine, raw: &str) -> VirtualMachine {
    vm.spec
        .template
        .metadata
        .get_or_insert_with(Default::default)
        .annotations
        .get_or_insert_with(Default::default)
        .insert(ANNOTATION_SSH_NAMES.to_string(), raw.to_string());
    vm
}

/// Helper to create a test instance in `phase` on `node`
pub fn create_test_vmi(
    namespace: &str,
    name: &str,
    phase: VmiPhase,
    node: &str,
    volumes: &[&str],
) -> VirtualMachineInstance {
    let mut vmi = VirtualMachineInstance {
        metadata: meta(namespace, name),
        spec: VirtualMachineInstanceSpec::default(),
        status: Some(VirtualMachineInstanceStatus {
            phase: Some(phase),
            node_name: Some(node.to_string()),
            ..Default::default()
        }),
    };
    for volume in volumes {
        vmi.spec.volumes.push(Volume {
            name: volume.to_string(),
            persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                claim_name: claim_name(name, volume),
                read_only: None,
                hotpluggable: None,
            }),
            extra: BTreeMap::new(),
        });
    }
    vmi
}

/// Helper to create a running instance on `node`
pub fn create_running_vmi(namespace: &str, name: &str, node: &str) -> VirtualMachineInstance {
    create_test_vmi(namespace, name, VmiPhase::Running, node, &["rootdisk"])
}

/// Mark the instance as driven by the migration with `uid`
pub fn with_migration_uid(mut vmi: VirtualMachineInstance, uid: &str) -> VirtualMachineInstance {
    vmi.metadata
        .annotations
        .get_or_insert_with(Default::default)
        .insert(ANNOTATION_MIGRATION_UID.to_string(), uid.to_string());
    vmi
}

/// Helper to create a test migration
pub fn create_test_migration(
    namespace: &str,
    name: &str,
    vmi_name: &str,
    uid: &str,
    phase: Option<MigrationPhase>,
) -> VirtualMachineInstanceMigration {
    let mut metadata = meta(namespace, name);
    metadata.uid = Some(uid.to_string());
    VirtualMachineInstanceMigration {
        metadata,
        spec: VirtualMachineInstanceMigrationSpec {
            vmi_name: vmi_name.to_string(),
        },
        status: phase.map(|phase| VirtualMachineInstanceMigrationStatus {
            phase: Some(phase),
            ..Default::default()
        }),
    }
}

pub fn create_test_node(name: &str) -> Node {
    Node {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Helper to create a claim, bound when `volume_name` is given
pub fn create_test_claim(namespace: &str, name: &str, volume_name: Option<&str>) -> PersistentVolumeClaim {
    PersistentVolumeClaim {
        metadata: meta(namespace, name),
        spec: Some(PersistentVolumeClaimSpec {
            volume_name: volume_name.map(str::to_string),
            ..Default::default()
        }),
        status: None,
    }
}

pub fn create_test_backup(namespace: &str, name: &str, vm_name: &str) -> VirtualMachineBackup {
    VirtualMachineBackup {
        metadata: meta(namespace, name),
        spec: VirtualMachineBackupSpec {
            source: TypedLocalObjectReference::virtual_machine(vm_name),
        },
        status: None,
    }
}

/// Helper to create the backup target setting
pub fn create_backup_target_setting(value: &str, configured: bool) -> Setting {
    Setting {
        metadata: ObjectMeta {
            name: Some(BACKUP_TARGET_SETTING_NAME.to_string()),
            ..Default::default()
        },
        value: Some(value.to_string()),
        default: None,
        status: Some(SettingStatus {
            conditions: vec![Condition {
                type_: SETTING_CONFIGURED_CONDITION.to_string(),
                status: if configured { "True" } else { "False" }.to_string(),
                reason: None,
                message: None,
            }],
        }),
    }
}

/// S3 backup target used by backup tests
pub fn s3_backup_target() -> BackupTarget {
    BackupTarget {
        target_type: TargetType::S3,
        endpoint: "https://s3.example.com".to_string(),
        bucket_name: "backups".to_string(),
        bucket_region: "us-east-1".to_string(),
        ..Default::default()
    }
}

/// Helper to create an orchestrator backed by `client`.
///
/// `backup_configured` decides what the backup target source reports.
pub fn create_test_orchestrator(client: &MockKubeVirtClient, backup_configured: bool) -> ActionOrchestrator {
    let backup_target = StaticBackupTarget {
        configured: backup_configured,
        target: backup_configured.then(s3_backup_target),
    };
    ActionOrchestrator::new(Arc::new(client.clone()), Arc::new(backup_target))
}
