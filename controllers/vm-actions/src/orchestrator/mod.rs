//! Action orchestration.
//!
//! Every action follows the same sequence: read the objects it needs,
//! validate, compute the new state, write only when something changed, then
//! make any dependent call. Writes carry the resource version that was read,
//! so a concurrent change surfaces as a Conflict for the caller to retry.
//!
//! This module is organized by the objects the actions drive:
//! - `media`: CD-ROM eject
//! - `migration`: migrate and abort
//! - `power`: start/stop/restart and pause/unpause
//! - `backup`: backup and restore
//! - `template`: template creation
//! - `volume`: hot-plug, hot-unplug and export

mod backup;
mod media;
mod migration;
mod power;
mod template;
mod volume;

#[cfg(test)]
mod backup_test;
#[cfg(test)]
mod media_test;

use crate::action::{VmAction, VolumeAction};
use crate::backup_target::BackupTargetSource;
use crate::error::ActionError;
use crds::{VmOperation, VmiOperation};
use kubevirt_client::KubeVirtClientTrait;
use std::sync::Arc;
use tracing::{info, warn};

/// Executes VM and volume actions against the object store.
pub struct ActionOrchestrator {
    pub(crate) client: Arc<dyn KubeVirtClientTrait>,
    pub(crate) backup_target: Arc<dyn BackupTargetSource>,
}

impl std::fmt::Debug for ActionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionOrchestrator").finish_non_exhaustive()
    }
}

impl ActionOrchestrator {
    pub fn new(
        client: Arc<dyn KubeVirtClientTrait>,
        backup_target: Arc<dyn BackupTargetSource>,
    ) -> Self {
        Self {
            client,
            backup_target,
        }
    }

    /// Run `action` against virtual machine `namespace/name`.
    pub async fn execute(&self, namespace: &str, name: &str, action: VmAction) -> Result<(), ActionError> {
        let action_name = action.name();
        info!("Executing {} on virtual machine {}/{}", action_name, namespace, name);

        let result = match action {
            VmAction::EjectCdRom(input) => self.eject_cdrom(namespace, name, &input).await,
            VmAction::Migrate(input) => self.migrate(namespace, name, &input).await,
            VmAction::AbortMigration => self.abort_migration(namespace, name).await,
            VmAction::Start => self.vm_operation(namespace, name, VmOperation::Start).await,
            VmAction::Stop => self.vm_operation(namespace, name, VmOperation::Stop).await,
            VmAction::Restart => self.vm_operation(namespace, name, VmOperation::Restart).await,
            VmAction::Pause => self.vmi_operation(namespace, name, VmiOperation::Pause).await,
            VmAction::Unpause => self.vmi_operation(namespace, name, VmiOperation::Unpause).await,
            VmAction::Backup(input) => self.backup(namespace, name, &input).await,
            VmAction::Restore(input) => self.restore(namespace, name, &input).await,
            VmAction::CreateTemplate(input) => self.create_template(namespace, name, &input).await,
            VmAction::AddVolume(input) => self.add_volume(namespace, name, &input).await,
            VmAction::RemoveVolume(input) => self.remove_volume(namespace, name, &input).await,
        };

        if let Err(e) = &result {
            warn!(
                "{} on virtual machine {}/{} failed ({}): {}",
                action_name,
                namespace,
                name,
                e.category(),
                e
            );
        }
        result
    }

    /// Run `action` against volume `namespace/name`.
    pub async fn execute_volume(&self, namespace: &str, name: &str, action: VolumeAction) -> Result<(), ActionError> {
        let result = match action {
            VolumeAction::Export(input) => {
                info!("Exporting volume {}/{}", namespace, name);
                self.export_volume(namespace, &input).await
            }
        };
        if let Err(e) = &result {
            warn!("Action on volume {}/{} failed ({}): {}", namespace, name, e.category(), e);
        }
        result
    }
}
