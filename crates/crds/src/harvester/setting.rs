//! Harvester Setting resource
//!
//! Settings are cluster-scoped and, unlike most CRDs, keep `value` and
//! `default` at the top level instead of under `spec`. The type is therefore
//! declared by hand and read through a dynamic API.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

/// Kind of the Harvester Setting resource
pub const SETTING_KIND: &str = "Setting";

/// Name of the setting holding the backup target
pub const BACKUP_TARGET_SETTING_NAME: &str = "backup-target";

/// Condition set by Harvester once a setting has been applied successfully
pub const SETTING_CONFIGURED_CONDITION: &str = "configured";

/// A cluster-scoped Harvester setting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    /// Standard object metadata
    #[serde(default)]
    pub metadata: ObjectMeta,

    /// Value set by an administrator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Built-in value used when `value` is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Status reported by the settings controller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SettingStatus>,
}

/// Observed state of a setting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingStatus {
    /// Conditions such as `configured`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

/// A single status condition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Condition type
    #[serde(rename = "type")]
    pub type_: String,

    /// "True", "False" or "Unknown"
    pub status: String,

    /// Machine readable reason for the last transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human readable detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Setting {
    /// Explicit value if set and non-empty, otherwise the default
    pub fn effective_value(&self) -> Option<&str> {
        self.value
            .as_deref()
            .filter(|v| !v.is_empty())
            .or(self.default.as_deref())
    }

    /// Whether Harvester reported the setting as successfully applied
    pub fn is_configured(&self) -> bool {
        self.status.as_ref().is_some_and(|status| {
            status
                .conditions
                .iter()
                .any(|c| c.type_ == SETTING_CONFIGURED_CONDITION && c.status == "True")
        })
    }
}

/// Backup store kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// No backup target set
    #[default]
    #[serde(alias = "")]
    None,
    /// S3 compatible object store
    S3,
    /// NFS export
    Nfs,
}

/// Decoded value of the `backup-target` setting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupTarget {
    /// Store kind
    #[serde(rename = "type", default)]
    pub target_type: TargetType,

    /// Store URL, e.g. `s3://bucket@region/` or `nfs://host:/path`
    #[serde(default)]
    pub endpoint: String,

    /// S3 access key
    #[serde(default, rename = "accessKeyId")]
    pub access_key_id: String,

    /// S3 secret key
    #[serde(default)]
    pub secret_access_key: String,

    /// S3 bucket
    #[serde(default)]
    pub bucket_name: String,

    /// S3 region
    #[serde(default)]
    pub bucket_region: String,

    /// PEM bundle trusted when talking to the endpoint
    #[serde(default)]
    pub cert: String,

    /// Use virtual-hosted-style S3 addressing
    #[serde(default)]
    pub virtual_hosted_style: bool,
}

impl BackupTarget {
    /// Parse the JSON value stored in the `backup-target` setting
    pub fn parse(value: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(value)
    }

    /// A target without an endpoint has never been filled in
    pub fn is_empty(&self) -> bool {
        self.endpoint.is_empty()
    }
}
