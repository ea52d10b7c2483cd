//! Precondition checks run before any mutation.
//!
//! Checks that only need object snapshots live here. Existence checks of
//! referenced objects (node, claim, backup) go through the store client in
//! the orchestrator and surface as NotFound.

use crate::error::ActionError;
use crds::{VirtualMachine, VirtualMachineInstance, VirtualMachineInstanceMigration};
use kube::ResourceExt;

/// Every named disk must exist on the VM and be a CD-ROM.
///
/// Ejecting a disk that is already gone is rejected like any other unknown
/// disk, so a replayed eject never reports success for work it did not do.
pub fn validate_eject(vm: &VirtualMachine, disk_names: &[String]) -> Result<(), ActionError> {
    for name in disk_names {
        match vm.disks().iter().find(|disk| &disk.name == name) {
            None => {
                return Err(ActionError::InvalidInput(format!(
                    "disk {} not found in virtual machine {}/{}",
                    name,
                    vm.namespace().unwrap_or_default(),
                    vm.name_any()
                )));
            }
            Some(disk) if !disk.is_cdrom() => {
                return Err(ActionError::InvalidInput(format!(
                    "disk {} isn't a CD-ROM disk",
                    name
                )));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Whether a migration currently occupies the instance.
///
/// Harvester's migration UID annotation, KubeVirt's migration state and any
/// non-terminal migration object naming the instance each count.
pub fn has_active_migration(
    vmi: &VirtualMachineInstance,
    migrations: &[VirtualMachineInstanceMigration],
) -> bool {
    let annotated = vmi.migration_uid().is_some();
    let in_progress = vmi.migration_state().is_some_and(|state| !state.is_finished());
    let vmi_name = vmi.name_any();
    let pending = migrations
        .iter()
        .any(|m| m.spec.vmi_name == vmi_name && m.is_active());
    annotated || in_progress || pending
}

/// The instance must be running and free of other migrations
pub fn validate_migrate(
    vmi: &VirtualMachineInstance,
    migrations: &[VirtualMachineInstanceMigration],
) -> Result<(), ActionError> {
    if !vmi.is_running() {
        return Err(ActionError::IllegalState(
            "The VM is not in running state".to_string(),
        ));
    }
    if has_active_migration(vmi, migrations) {
        return Err(ActionError::IllegalState(
            "The VM is already in migrating state".to_string(),
        ));
    }
    Ok(())
}

/// A requested target must differ from the node the instance runs on
pub fn validate_migration_target(vmi: &VirtualMachineInstance, node: &str) -> Result<(), ActionError> {
    if vmi.node_name() == Some(node) {
        return Err(ActionError::InvalidInput(
            "The VM is currently running on the target node".to_string(),
        ));
    }
    Ok(())
}

/// Find the migration to abort: the one whose UID the instance currently
/// reports, and only while it is Running.
pub fn find_abortable_migration<'a>(
    vmi: &VirtualMachineInstance,
    migrations: &'a [VirtualMachineInstanceMigration],
) -> Result<&'a VirtualMachineInstanceMigration, ActionError> {
    let uid = vmi
        .migration_uid()
        .ok_or_else(|| ActionError::IllegalState("The VM is not in migrating state".to_string()))?;

    let migration = migrations
        .iter()
        .find(|m| m.metadata.uid.as_deref() == Some(uid))
        .ok_or_else(|| {
            ActionError::IllegalState(format!("no migration found with UID {}", uid))
        })?;

    if !migration.is_running() {
        let phase = migration
            .phase()
            .map_or_else(|| "Unknown".to_string(), |p| p.to_string());
        return Err(ActionError::IllegalState(format!(
            "cannot abort the migration as it is in \"{}\" phase",
            phase
        )));
    }
    Ok(migration)
}

/// The disk must be among the volumes the instance currently has attached
pub fn validate_remove_volume(vmi: &VirtualMachineInstance, disk_name: &str) -> Result<(), ActionError> {
    if vmi.volume_names().any(|name| name == disk_name) {
        return Ok(());
    }
    Err(ActionError::NotFound(format!(
        "Disk `{}` not found in virtual machine `{}/{}`",
        disk_name,
        vmi.namespace().unwrap_or_default(),
        vmi.name_any()
    )))
}
