//! Live migration
//!
//! Handles: migrate, abortMigration

use super::ActionOrchestrator;
use crate::action::MigrateInput;
use crate::error::ActionError;
use crate::requests;
use crate::transform::pin_migration_target;
use crate::validator::{find_abortable_migration, validate_migrate, validate_migration_target};
use kube::ResourceExt;
use tracing::info;

impl ActionOrchestrator {
    /// Requests a live migration, optionally to a specific node.
    pub(crate) async fn migrate(
        &self,
        namespace: &str,
        name: &str,
        input: &MigrateInput,
    ) -> Result<(), ActionError> {
        let vmi = self.client.get_vmi(namespace, name).await?;
        let migrations = self.client.list_migrations(namespace).await?;
        validate_migrate(&vmi, &migrations)?;

        let target = input.node_name.as_str();
        if !target.is_empty() {
            self.client.get_node(target).await?;
            validate_migration_target(&vmi, target)?;

            let pinned = pin_migration_target(&vmi, target);
            if pinned != vmi {
                self.client.update_vmi(&pinned).await?;
                info!("Pinned instance {}/{} to node {}", namespace, name, target);
            }
        }

        let migration = self
            .client
            .create_migration(&requests::migration(namespace, name))
            .await?;
        info!(
            "Created migration {}/{} for virtual machine {}",
            namespace,
            migration.name_any(),
            name
        );
        Ok(())
    }

    /// Aborts the running migration by deleting it.
    pub(crate) async fn abort_migration(&self, namespace: &str, name: &str) -> Result<(), ActionError> {
        let vmi = self.client.get_vmi(namespace, name).await?;
        let migrations = self.client.list_migrations(namespace).await?;
        let migration = find_abortable_migration(&vmi, &migrations)?;

        let migration_name = migration.name_any();
        self.client.delete_migration(namespace, &migration_name).await?;
        info!(
            "Aborted migration {}/{} of virtual machine {}",
            namespace, migration_name, name
        );
        Ok(())
    }
}
