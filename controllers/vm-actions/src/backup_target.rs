//! Backup target capability.
//!
//! The orchestrator receives a [`BackupTargetSource`] at construction and
//! asks it whether backups can be taken. It never looks settings up by name
//! itself.

use crds::{BackupTarget, Setting};
use kubevirt_client::KubeVirtClientTrait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Source of the cluster's backup target
#[async_trait::async_trait]
pub trait BackupTargetSource: Send + Sync {
    /// Whether a backup target is configured, and the decoded target if any.
    ///
    /// Lookup failures count as "not configured".
    async fn backup_target(&self) -> (bool, Option<BackupTarget>);
}

/// Reads the backup target from a Harvester setting
pub struct SettingBackupTarget {
    client: Arc<dyn KubeVirtClientTrait>,
    setting_name: String,
}

impl SettingBackupTarget {
    pub fn new(client: Arc<dyn KubeVirtClientTrait>, setting_name: impl Into<String>) -> Self {
        Self {
            client,
            setting_name: setting_name.into(),
        }
    }

    fn decode(&self, setting: &Setting) -> Option<BackupTarget> {
        let value = setting.effective_value()?;
        match BackupTarget::parse(value) {
            Ok(target) if !target.is_empty() => Some(target),
            Ok(_) => None,
            Err(e) => {
                debug!("Setting {} holds an undecodable backup target: {}", self.setting_name, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for SettingBackupTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingBackupTarget")
            .field("setting_name", &self.setting_name)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl BackupTargetSource for SettingBackupTarget {
    async fn backup_target(&self) -> (bool, Option<BackupTarget>) {
        match self.client.get_setting(&self.setting_name).await {
            Ok(setting) => (setting.is_configured(), self.decode(&setting)),
            Err(e) => {
                warn!("Failed to read setting {}: {}", self.setting_name, e);
                (false, None)
            }
        }
    }
}

/// Fixed answer
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct StaticBackupTarget {
    pub configured: bool,
    pub target: Option<BackupTarget>,
}

#[cfg(test)]
#[async_trait::async_trait]
impl BackupTargetSource for StaticBackupTarget {
    async fn backup_target(&self) -> (bool, Option<BackupTarget>) {
        (self.configured, self.target.clone())
    }
}
