//! Server configuration loaded from environment variables.

use crate::error::ActionError;
use crds::BACKUP_TARGET_SETTING_NAME;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CACHE_SYNC_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration of the action server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to (`LISTEN_ADDR`)
    pub listen_addr: SocketAddr,
    /// Namespace the claim and backup caches are scoped to (`WATCH_NAMESPACE`)
    pub watch_namespace: Option<String>,
    /// Name of the Harvester setting holding the backup target (`BACKUP_TARGET_SETTING`)
    pub backup_target_setting: String,
    /// How long startup waits for the caches (`CACHE_SYNC_TIMEOUT_SECS`)
    pub cache_sync_timeout: Duration,
}

impl ServerConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ActionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ActionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr = get("LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ActionError::InvalidConfig(format!("LISTEN_ADDR: {}", e)))?;

        let cache_sync_timeout = match get("CACHE_SYNC_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ActionError::InvalidConfig(format!("CACHE_SYNC_TIMEOUT_SECS '{}': {}", raw, e))
            })?,
            None => DEFAULT_CACHE_SYNC_TIMEOUT_SECS,
        };

        Ok(Self {
            listen_addr,
            watch_namespace: get("WATCH_NAMESPACE"),
            backup_target_setting: get("BACKUP_TARGET_SETTING")
                .unwrap_or_else(|| BACKUP_TARGET_SETTING_NAME.to_string()),
            cache_sync_timeout: Duration::from_secs(cache_sync_timeout),
        })
    }
}
