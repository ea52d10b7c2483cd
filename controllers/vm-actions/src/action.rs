//! Typed action requests.
//!
//! An HTTP request names its action in the query string and carries a JSON
//! body. Both are decoded here into a closed [`VmAction`] (or
//! [`VolumeAction`]) so the orchestrator dispatches with an exhaustive match.
//! Required-field checks happen during decoding, before any object is read.

use crate::error::ActionError;
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EjectCdRomInput {
    #[serde(default)]
    pub disk_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrateInput {
    /// Target node; empty lets the scheduler pick
    #[serde(default)]
    pub node_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupInput {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub backup_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddVolumeInput {
    #[serde(default)]
    pub disk_name: String,
    /// Name of the PersistentVolumeClaim to hot-plug
    #[serde(default)]
    pub volume_source_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveVolumeInput {
    #[serde(default)]
    pub disk_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportVolumeInput {
    #[serde(default)]
    pub disk_name: String,
    /// Name of the PersistentVolumeClaim to export
    #[serde(default)]
    pub volume_source_name: String,
}

/// An action on a virtual machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmAction {
    EjectCdRom(EjectCdRomInput),
    Migrate(MigrateInput),
    AbortMigration,
    Start,
    Stop,
    Restart,
    Pause,
    Unpause,
    Backup(BackupInput),
    Restore(RestoreInput),
    CreateTemplate(CreateTemplateInput),
    AddVolume(AddVolumeInput),
    RemoveVolume(RemoveVolumeInput),
}

impl VmAction {
    /// Decode the action named `action` with request body `body`.
    ///
    /// An empty body is read as `{}`. Actions without input ignore the body.
    pub fn decode(action: &str, body: &[u8]) -> Result<Self, ActionError> {
        let decoded = match action {
            "ejectCdRom" => {
                let input: EjectCdRomInput = decode_body(body)?;
                if input.disk_names.is_empty() {
                    return Err(ActionError::InvalidInput(
                        "Parameter diskNames is empty".to_string(),
                    ));
                }
                VmAction::EjectCdRom(input)
            }
            "migrate" => VmAction::Migrate(decode_body(body)?),
            "abortMigration" => VmAction::AbortMigration,
            "start" => VmAction::Start,
            "stop" => VmAction::Stop,
            "restart" => VmAction::Restart,
            "pause" => VmAction::Pause,
            "unpause" => VmAction::Unpause,
            "backup" => {
                let input: BackupInput = decode_body(body)?;
                if input.name.is_empty() {
                    return Err(ActionError::InvalidInput(
                        "Parameter backup name is required".to_string(),
                    ));
                }
                VmAction::Backup(input)
            }
            "restore" => {
                let input: RestoreInput = decode_body(body)?;
                if input.name.is_empty() || input.backup_name.is_empty() {
                    return Err(ActionError::InvalidInput(
                        "Parameter name and backupName are required".to_string(),
                    ));
                }
                VmAction::Restore(input)
            }
            "createTemplate" => {
                let input: CreateTemplateInput = decode_body(body)?;
                if input.name.is_empty() {
                    return Err(ActionError::InvalidInput(
                        "Template name is required".to_string(),
                    ));
                }
                VmAction::CreateTemplate(input)
            }
            "addVolume" => {
                let input: AddVolumeInput = decode_body(body)?;
                if input.disk_name.is_empty() || input.volume_source_name.is_empty() {
                    return Err(ActionError::InvalidInput(
                        "Parameter `diskName` and `volumeSourceName` are required".to_string(),
                    ));
                }
                VmAction::AddVolume(input)
            }
            "removeVolume" => {
                let input: RemoveVolumeInput = decode_body(body)?;
                if input.disk_name.is_empty() {
                    return Err(ActionError::InvalidInput(
                        "Parameter `diskName` is required".to_string(),
                    ));
                }
                VmAction::RemoveVolume(input)
            }
            _ => return Err(unsupported()),
        };
        Ok(decoded)
    }

    /// Wire name of the action
    pub fn name(&self) -> &'static str {
        match self {
            VmAction::EjectCdRom(_) => "ejectCdRom",
            VmAction::Migrate(_) => "migrate",
            VmAction::AbortMigration => "abortMigration",
            VmAction::Start => "start",
            VmAction::Stop => "stop",
            VmAction::Restart => "restart",
            VmAction::Pause => "pause",
            VmAction::Unpause => "unpause",
            VmAction::Backup(_) => "backup",
            VmAction::Restore(_) => "restore",
            VmAction::CreateTemplate(_) => "createTemplate",
            VmAction::AddVolume(_) => "addVolume",
            VmAction::RemoveVolume(_) => "removeVolume",
        }
    }
}

/// An action on a volume
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeAction {
    Export(ExportVolumeInput),
}

impl VolumeAction {
    pub fn decode(action: &str, body: &[u8]) -> Result<Self, ActionError> {
        match action {
            "export" => {
                let input: ExportVolumeInput = decode_body(body)?;
                if input.volume_source_name.is_empty() {
                    return Err(ActionError::InvalidInput(
                        "Parameter `volumeSourceName` is required".to_string(),
                    ));
                }
                Ok(VolumeAction::Export(input))
            }
            _ => Err(unsupported()),
        }
    }
}

pub(crate) fn unsupported() -> ActionError {
    ActionError::InvalidInput("Unsupported action".to_string())
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ActionError> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body)
        .map_err(|e| ActionError::InvalidInput(format!("Failed to decode request body: {}", e)))
}
