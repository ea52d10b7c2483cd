//! Longhorn BackingImage CRD (`longhorn.io/v1beta1`)
//!
//! Exporting a volume asks Longhorn to build a backing image from the volume's
//! current data.

use kube::CustomResource;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Namespace Longhorn keeps its own resources in
pub const LONGHORN_SYSTEM_NAMESPACE: &str = "longhorn-system";

/// Backing image data source exporting an existing volume
pub const DATA_SOURCE_EXPORT_FROM_VOLUME: &str = "export-from-volume";

/// Source parameter naming the exported volume
pub const EXPORT_PARAMETER_VOLUME_NAME: &str = "volume-name";

/// Source parameter selecting the export format
pub const EXPORT_PARAMETER_EXPORT_TYPE: &str = "export-type";

/// Raw image export format
pub const EXPORT_TYPE_RAW: &str = "raw";

/// Longhorn backing image
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "longhorn.io",
    version = "v1beta1",
    kind = "BackingImage",
    namespaced,
    shortname = "lhbi",
    schema = "disabled",
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct BackingImageSpec {
    /// Disks the image is placed on; Longhorn fills this in
    #[serde(default)]
    pub disks: BTreeMap<String, Value>,

    /// Where the image data comes from
    pub source_type: String,

    /// Parameters for `source_type`
    #[serde(default)]
    pub source_parameters: BTreeMap<String, String>,
}
