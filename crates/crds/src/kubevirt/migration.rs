//! VirtualMachineInstanceMigration CRD
//!
//! A request to live-migrate an instance. Creating one starts a migration;
//! deleting a running one aborts it.

use kube::CustomResource;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Request to live-migrate one instance
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "kubevirt.io",
    version = "v1",
    kind = "VirtualMachineInstanceMigration",
    namespaced,
    status = "VirtualMachineInstanceMigrationStatus",
    shortname = "vmim",
    schema = "disabled",
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineInstanceMigrationSpec {
    /// Name of the instance to migrate (same namespace)
    pub vmi_name: String,
}

/// Observed state of a migration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineInstanceMigrationStatus {
    /// Current phase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<MigrationPhase>,

    /// Fields not modelled here, preserved on write
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Migration phase as reported by KubeVirt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MigrationPhase {
    /// Created, not yet picked up
    Pending,
    /// Target pod is being scheduled
    Scheduling,
    /// Target pod has a node
    Scheduled,
    /// Target pod is preparing to receive the domain
    PreparingTarget,
    /// Target is ready, transfer about to start
    TargetReady,
    /// Memory is being transferred
    Running,
    /// Instance now runs on the target
    Succeeded,
    /// Migration aborted or errored
    Failed,
    /// Unset or unrecognised phase
    #[serde(other)]
    Unknown,
}

impl MigrationPhase {
    /// Succeeded and Failed are final; every other phase may still progress
    pub fn is_terminal(self) -> bool {
        matches!(self, MigrationPhase::Succeeded | MigrationPhase::Failed)
    }
}

impl std::fmt::Display for MigrationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MigrationPhase::Pending => "Pending",
            MigrationPhase::Scheduling => "Scheduling",
            MigrationPhase::Scheduled => "Scheduled",
            MigrationPhase::PreparingTarget => "PreparingTarget",
            MigrationPhase::TargetReady => "TargetReady",
            MigrationPhase::Running => "Running",
            MigrationPhase::Succeeded => "Succeeded",
            MigrationPhase::Failed => "Failed",
            MigrationPhase::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

impl VirtualMachineInstanceMigration {
    /// Reported phase, if any
    pub fn phase(&self) -> Option<MigrationPhase> {
        self.status.as_ref().and_then(|s| s.phase)
    }

    /// Only an actively running migration can be aborted
    pub fn is_running(&self) -> bool {
        self.phase() == Some(MigrationPhase::Running)
    }

    /// A migration without a terminal phase still occupies its instance
    pub fn is_active(&self) -> bool {
        !self.phase().is_some_and(MigrationPhase::is_terminal)
    }
}
