//! Volume hot-plug and export
//!
//! Handles: addVolume, removeVolume, export

use super::ActionOrchestrator;
use crate::action::{AddVolumeInput, ExportVolumeInput, RemoveVolumeInput};
use crate::error::ActionError;
use crate::requests;
use crate::transform::{add_volume_options, remove_volume_options};
use crate::validator::validate_remove_volume;
use kube::ResourceExt;
use tracing::{error, info};

impl ActionOrchestrator {
    /// Hot-plugs an existing claim as a SCSI disk.
    ///
    /// KubeVirt does not check that the claim exists, so it is checked here.
    pub(crate) async fn add_volume(
        &self,
        namespace: &str,
        name: &str,
        input: &AddVolumeInput,
    ) -> Result<(), ActionError> {
        self.client
            .get_claim(namespace, &input.volume_source_name)
            .await?;

        self.client
            .add_volume(namespace, name, &add_volume_options(input))
            .await?;
        info!(
            "Hot-plugged claim {} as disk {} into virtual machine {}/{}",
            input.volume_source_name, input.disk_name, namespace, name
        );
        Ok(())
    }

    pub(crate) async fn remove_volume(
        &self,
        namespace: &str,
        name: &str,
        input: &RemoveVolumeInput,
    ) -> Result<(), ActionError> {
        let vmi = self.client.get_vmi(namespace, name).await?;
        validate_remove_volume(&vmi, &input.disk_name)?;

        self.client
            .remove_volume(namespace, name, &remove_volume_options(input))
            .await?;
        info!(
            "Hot-unplugged disk {} from virtual machine {}/{}",
            input.disk_name, namespace, name
        );
        Ok(())
    }

    /// Exports the Longhorn volume bound to a claim as a backing image.
    pub(crate) async fn export_volume(
        &self,
        namespace: &str,
        input: &ExportVolumeInput,
    ) -> Result<(), ActionError> {
        let claim_name = input.volume_source_name.as_str();
        let claim = self
            .client
            .get_claim(namespace, claim_name)
            .await
            .map_err(|e| {
                ActionError::from(e).context(format!("failed to get pvc {}/{}", namespace, claim_name))
            })?;

        let volume_name = claim
            .spec
            .as_ref()
            .and_then(|spec| spec.volume_name.clone())
            .filter(|volume| !volume.is_empty())
            .ok_or_else(|| {
                ActionError::InvalidInput(format!(
                    "pvc {}/{} is not bound to a volume",
                    namespace,
                    claim.name_any()
                ))
            })?;

        let image = self
            .client
            .create_backing_image(&requests::volume_export(&volume_name))
            .await
            .map_err(|e| {
                error!("Failed to create backing image for volume {}: {}", volume_name, e);
                ActionError::from(e)
            })?;
        info!(
            "Created backing image {} exporting volume {}",
            image.name_any(),
            volume_name
        );
        Ok(())
    }
}
