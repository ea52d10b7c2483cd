//! VirtualMachineInstance CRD
//!
//! Runtime view of a VM while it is scheduled to run. The action server only
//! reads it to decide whether an action is legal, except for pinning a
//! migration target through the node selector.

use kube::{CustomResource, ResourceExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::virtual_machine::{DomainSpec, Volume};
use crate::annotations::ANNOTATION_MIGRATION_UID;

/// Desired state of a running VM instance
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "kubevirt.io",
    version = "v1",
    kind = "VirtualMachineInstance",
    namespaced,
    status = "VirtualMachineInstanceStatus",
    shortname = "vmi",
    schema = "disabled",
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineInstanceSpec {
    /// Virtual hardware
    #[serde(default)]
    pub domain: DomainSpec,

    /// Volumes backing the domain disks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,

    /// Node labels the instance (and a migration target) must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,

    /// Fields not modelled here, preserved on write
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Observed state of a VM instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineInstanceStatus {
    /// Lifecycle phase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<VmiPhase>,

    /// Node the instance currently runs on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,

    /// Latest migration KubeVirt ran for this instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_state: Option<MigrationState>,

    /// Fields not modelled here, preserved on write
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Instance lifecycle phase
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VmiPhase {
    /// Accepted but not yet scheduled
    Pending,
    /// Waiting for a node
    Scheduling,
    /// Placed on a node, domain starting
    Scheduled,
    /// Domain is up
    Running,
    /// Domain shut down cleanly
    Succeeded,
    /// Domain crashed or could not start
    Failed,
    /// Unset or unrecognised phase
    #[serde(other)]
    Unknown,
}

/// Migration summary in the instance status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationState {
    /// UID of the migration object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_uid: Option<String>,

    /// Node the instance is leaving
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_node: Option<String>,

    /// Node the instance is moving to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_node: Option<String>,

    /// Migration finished successfully
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,

    /// Migration gave up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed: Option<bool>,

    /// Fields not modelled here, preserved on write
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl MigrationState {
    /// Whether the migration described by this state has finished either way
    pub fn is_finished(&self) -> bool {
        self.completed.unwrap_or(false) || self.failed.unwrap_or(false)
    }
}

impl VirtualMachineInstance {
    /// Reported lifecycle phase, if any
    pub fn phase(&self) -> Option<VmiPhase> {
        self.status.as_ref().and_then(|s| s.phase)
    }

    /// Whether the domain is up
    pub fn is_running(&self) -> bool {
        self.phase() == Some(VmiPhase::Running)
    }

    /// Node the instance currently runs on, if scheduled
    pub fn node_name(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|s| s.node_name.as_deref())
            .filter(|n| !n.is_empty())
    }

    /// Migration summary from the status
    pub fn migration_state(&self) -> Option<&MigrationState> {
        self.status.as_ref().and_then(|s| s.migration_state.as_ref())
    }

    /// UID of the migration currently associated with this instance.
    ///
    /// Harvester's annotation wins over KubeVirt's status because it is set
    /// as soon as a migration is picked up, before KubeVirt reports it.
    pub fn migration_uid(&self) -> Option<&str> {
        if let Some(uid) = self
            .annotations()
            .get(ANNOTATION_MIGRATION_UID)
            .filter(|uid| !uid.is_empty())
        {
            return Some(uid.as_str());
        }
        self.migration_state()
            .and_then(|state| state.migration_uid.as_deref())
            .filter(|uid| !uid.is_empty())
    }

    /// Names of the volumes currently attached to the instance
    pub fn volume_names(&self) -> impl Iterator<Item = &str> {
        self.spec.volumes.iter().map(|v| v.name.as_str())
    }
}
