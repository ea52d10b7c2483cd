//! CD-ROM eject
//!
//! Handles: ejectCdRom

use super::ActionOrchestrator;
use crate::action::EjectCdRomInput;
use crate::error::ActionError;
use crate::transform::eject_cdroms;
use crate::validator::validate_eject;
use crds::VmOperation;
use tracing::{debug, info};

impl ActionOrchestrator {
    /// Removes CD-ROM disks from the VM and restarts it.
    ///
    /// The restart is a second, separate call: when it fails the VM update
    /// has already been committed and the error is a PartialFailure.
    pub(crate) async fn eject_cdrom(
        &self,
        namespace: &str,
        name: &str,
        input: &EjectCdRomInput,
    ) -> Result<(), ActionError> {
        let vm = self.client.get_vm(namespace, name).await?;
        validate_eject(&vm, &input.disk_names)?;

        let ejected = eject_cdroms(&vm, &input.disk_names)?;
        if ejected == vm {
            debug!("Virtual machine {}/{} unchanged by eject, skipping update", namespace, name);
            return Ok(());
        }

        self.client.update_vm(&ejected).await?;
        info!(
            "Ejected {} from virtual machine {}/{}",
            input.disk_names.join(", "),
            namespace,
            name
        );

        self.client
            .vm_subresource(namespace, name, VmOperation::Restart)
            .await
            .map_err(|e| {
                ActionError::from(e).partial(format!(
                    "virtual machine {}/{} was updated but the restart failed",
                    namespace, name
                ))
            })?;
        info!("Restarted virtual machine {}/{} after eject", namespace, name);
        Ok(())
    }
}
