//! VirtualMachineTemplate and VirtualMachineTemplateVersion CRDs
//!
//! A template is a named container; each version carries a full VM spec that
//! new machines are stamped from.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

use crate::kubevirt::VirtualMachineSpec;

/// A named VM template
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "harvesterhci.io",
    version = "v1beta1",
    kind = "VirtualMachineTemplate",
    namespaced,
    status = "VirtualMachineTemplateStatus",
    shortname = "vmtemplate",
    schema = "disabled",
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineTemplateSpec {
    /// Free-form description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Version used when the template is instantiated without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_version_id: Option<String>,
}

/// Version bookkeeping maintained by Harvester
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineTemplateStatus {
    /// Number of the default version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_version: Option<i64>,

    /// Number of the newest version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<i64>,
}

/// One version of a VM template
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "harvesterhci.io",
    version = "v1beta1",
    kind = "VirtualMachineTemplateVersion",
    namespaced,
    status = "VirtualMachineTemplateVersionStatus",
    shortname = "vmtemplateversion",
    schema = "disabled",
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineTemplateVersionSpec {
    /// Owning template as `<namespace>/<name>`
    pub template_id: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// SSH key names injected into machines created from this version
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_pair_ids: Vec<String>,

    /// VM stamped out by this version
    pub vm: VirtualMachineSourceSpec,
}

/// VM object embedded in a template version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineSourceSpec {
    /// Labels and annotations copied to new machines
    #[serde(default)]
    pub metadata: ObjectMeta,

    /// VM spec copied to new machines
    pub spec: VirtualMachineSpec,
}

/// Observed state of a template version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineTemplateVersionStatus {
    /// Sequence number assigned by Harvester
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}
