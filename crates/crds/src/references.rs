//! Kubernetes object references
//!
//! Follows the Kubernetes `TypedLocalObjectReference` pattern with apiGroup,
//! kind and name. Backups and restores use it to point at their source VM.

use serde::{Deserialize, Serialize};

use crate::kubevirt::{KUBEVIRT_API_GROUP, VIRTUAL_MACHINE_KIND};

/// Reference to an object in the same namespace as the referencing object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypedLocalObjectReference {
    /// API group of the referenced resource (e.g., "kubevirt.io")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_group: Option<String>,

    /// Kind of the referenced resource (e.g., "VirtualMachine")
    pub kind: String,

    /// Name of the referenced resource
    pub name: String,
}

impl TypedLocalObjectReference {
    /// Create a new reference with apiGroup, kind and name
    pub fn new(api_group: impl Into<String>, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            api_group: Some(api_group.into()),
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Reference to a KubeVirt VirtualMachine
    pub fn virtual_machine(name: impl Into<String>) -> Self {
        Self::new(KUBEVIRT_API_GROUP, VIRTUAL_MACHINE_KIND, name)
    }
}
