//! Backup and restore
//!
//! Handles: backup, restore

use super::ActionOrchestrator;
use crate::action::{BackupInput, RestoreInput};
use crate::error::ActionError;
use crate::requests;
use tracing::{debug, info};

impl ActionOrchestrator {
    /// Fails with PreconditionFailed unless a backup target is configured
    async fn require_backup_target(&self) -> Result<(), ActionError> {
        let (configured, target) = self.backup_target.backup_target().await;
        if !configured {
            return Err(ActionError::PreconditionFailed(
                "backup target is invalid".to_string(),
            ));
        }
        if let Some(target) = target {
            debug!("Using {:?} backup target {}", target.target_type, target.endpoint);
        }
        Ok(())
    }

    pub(crate) async fn backup(
        &self,
        namespace: &str,
        name: &str,
        input: &BackupInput,
    ) -> Result<(), ActionError> {
        self.require_backup_target().await?;

        self.client
            .create_backup(&requests::backup(namespace, name, &input.name))
            .await
            .map_err(|e| ActionError::from(e).context("failed to create VM backup"))?;
        info!("Created backup {}/{} of virtual machine {}", namespace, input.name, name);
        Ok(())
    }

    /// Restores the VM in place from a backup in the same namespace.
    pub(crate) async fn restore(
        &self,
        namespace: &str,
        name: &str,
        input: &RestoreInput,
    ) -> Result<(), ActionError> {
        self.require_backup_target().await?;
        self.client.get_backup(namespace, &input.backup_name).await?;

        self.client
            .create_restore(&requests::restore(namespace, name, input))
            .await
            .map_err(|e| ActionError::from(e).context("failed to create restore"))?;
        info!(
            "Created restore {}/{} of virtual machine {} from backup {}",
            namespace, input.name, name, input.backup_name
        );
        Ok(())
    }
}
