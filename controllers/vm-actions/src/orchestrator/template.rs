//! Template derivation
//!
//! Handles: createTemplate

use super::ActionOrchestrator;
use crate::action::CreateTemplateInput;
use crate::annotations::ssh_key_names;
use crate::error::ActionError;
use crate::requests;
use crate::transform::template_source;
use kube::ResourceExt;
use tracing::info;

impl ActionOrchestrator {
    /// Creates a template and its first version derived from the VM.
    ///
    /// The VM is read and its SSH key annotation decoded before anything is
    /// created, so a bad source leaves no empty template behind.
    pub(crate) async fn create_template(
        &self,
        namespace: &str,
        name: &str,
        input: &CreateTemplateInput,
    ) -> Result<(), ActionError> {
        let vm = self.client.get_vm(namespace, name).await?;
        let key_pair_ids = ssh_key_names(vm.template_annotations())?;
        let source = template_source(&vm);

        let template = self
            .client
            .create_template(&requests::template(namespace, input))
            .await?;
        let template_name = template.name_any();

        let version = self
            .client
            .create_template_version(&requests::template_version(
                namespace,
                &template_name,
                name,
                source,
                key_pair_ids,
            ))
            .await?;
        info!(
            "Created template {}/{} (version {}) from virtual machine {}",
            namespace,
            template_name,
            version.name_any(),
            name
        );
        Ok(())
    }
}
