//! Power state subresources
//!
//! Handles: start, stop, restart (VM) and pause, unpause (instance)

use super::ActionOrchestrator;
use crate::error::ActionError;
use crds::{VmOperation, VmiOperation};

impl ActionOrchestrator {
    pub(crate) async fn vm_operation(
        &self,
        namespace: &str,
        name: &str,
        operation: VmOperation,
    ) -> Result<(), ActionError> {
        self.client
            .vm_subresource(namespace, name, operation)
            .await
            .map_err(|e| {
                ActionError::from(e).context(format!(
                    "{} virtual machine {}/{} failed",
                    operation.as_str(),
                    namespace,
                    name
                ))
            })
    }

    pub(crate) async fn vmi_operation(
        &self,
        namespace: &str,
        name: &str,
        operation: VmiOperation,
    ) -> Result<(), ActionError> {
        self.client
            .vmi_subresource(namespace, name, operation)
            .await
            .map_err(|e| {
                ActionError::from(e).context(format!(
                    "{} virtual machine {}/{} failed",
                    operation.as_str(),
                    namespace,
                    name
                ))
            })
    }
}
