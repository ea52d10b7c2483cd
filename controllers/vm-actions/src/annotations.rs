//! JSON lists embedded in annotations.
//!
//! Harvester keeps two auxiliary lists as annotation strings:
//! - the volume claim templates of a VM, which must name exactly the claims
//!   behind its claim-backed volumes
//! - the SSH key names of the instance template
//!
//! The claim template list is never edited on its own. [`drop_claim_volumes`]
//! removes volumes and their claim templates in one step so the two cannot
//! drift apart.

use crate::error::ActionError;
use crds::{ANNOTATION_SSH_NAMES, ANNOTATION_VOLUME_CLAIM_TEMPLATES, Volume};
use serde_json::Value;
use std::collections::BTreeMap;

/// Decode the volume claim template annotation value.
///
/// Entries stay raw JSON objects; re-encoding writes back only the fields
/// each template already had.
pub fn decode_claim_templates(raw: &str) -> Result<Vec<Value>, ActionError> {
    let invalid = |detail: String| {
        ActionError::InvalidInput(format!(
            "annotation {} is not a valid claim template list: {}",
            ANNOTATION_VOLUME_CLAIM_TEMPLATES, detail
        ))
    };
    let templates: Vec<Value> = serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))?;
    if let Some(position) = templates.iter().position(|t| !t.is_object()) {
        return Err(invalid(format!("entry {} is not an object", position)));
    }
    Ok(templates)
}

/// Claim name of a decoded template (`metadata.name`)
pub fn claim_template_name(template: &Value) -> Option<&str> {
    template.pointer("/metadata/name").and_then(Value::as_str)
}

/// Encode claim templates; an empty list is written as `[]`
pub fn encode_claim_templates(templates: &[Value]) -> Result<String, ActionError> {
    serde_json::to_string(templates).map_err(|e| {
        ActionError::Internal(format!(
            "failed to encode {}: {}",
            ANNOTATION_VOLUME_CLAIM_TEMPLATES, e
        ))
    })
}

/// Volumes and claim template annotation after claim-backed volumes were dropped
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimVolumes {
    /// Remaining volumes in their original order
    pub volumes: Vec<Volume>,
    /// Re-encoded annotation, `None` when the source had none
    pub claim_templates: Option<String>,
}

/// Drop the claim-backed volumes named in `names`, together with the claim
/// templates for their claims.
///
/// Volumes not backed by a claim are kept even when named. Claim templates
/// are matched by claim name and keep their relative order.
pub fn drop_claim_volumes(
    volumes: &[Volume],
    claim_templates: Option<&str>,
    names: &[String],
) -> Result<ClaimVolumes, ActionError> {
    let mut dropped_claims = Vec::new();
    let remaining: Vec<Volume> = volumes
        .iter()
        .filter(|volume| match volume.claim_name() {
            Some(claim) if names.contains(&volume.name) => {
                dropped_claims.push(claim.to_string());
                false
            }
            _ => true,
        })
        .cloned()
        .collect();

    let claim_templates = match claim_templates {
        None => None,
        Some(raw) => {
            let kept: Vec<Value> = decode_claim_templates(raw)?
                .into_iter()
                .filter(|template| {
                    !claim_template_name(template)
                        .is_some_and(|name| dropped_claims.iter().any(|claim| claim == name))
                })
                .collect();
            Some(encode_claim_templates(&kept)?)
        }
    };

    Ok(ClaimVolumes {
        volumes: remaining,
        claim_templates,
    })
}

/// SSH key names from instance template annotations.
///
/// A missing annotation yields an empty list; malformed JSON is rejected.
pub fn ssh_key_names(annotations: Option<&BTreeMap<String, String>>) -> Result<Vec<String>, ActionError> {
    let Some(raw) = annotations.and_then(|a| a.get(ANNOTATION_SSH_NAMES)) else {
        return Ok(Vec::new());
    };
    serde_json::from_str(raw).map_err(|e| {
        ActionError::InvalidInput(format!(
            "annotation {} is not a valid list of key names: {}",
            ANNOTATION_SSH_NAMES, e
        ))
    })
}
