//! VM Action Server
//!
//! Translates imperative requests against virtual machines (eject CD-ROM,
//! migrate, power operations, backup and restore, template creation, volume
//! hot-plug and export) into KubeVirt and Harvester state transitions.
//!
//! Every action is a short read-validate-write sequence against the API
//! server, guarded by resource versions so concurrent changes surface as
//! conflicts instead of lost updates.

mod action;
mod annotations;
mod backup_target;
mod config;
mod controller;
mod error;
mod orchestrator;
mod requests;
mod server;
mod transform;
mod validator;

#[cfg(test)]
mod server_test;
#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod validator_test;

use crate::config::ServerConfig;
use crate::error::ActionError;
use controller::Controller;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ActionError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = rustls::crypto::ring::default_provider().install_default() {
        warn!("Crypto provider already installed: {:?}", e);
    }

    info!("Starting VM Action Server");

    let config = ServerConfig::from_env()?;

    info!("Configuration:");
    info!("  Listen address: {}", config.listen_addr);
    info!(
        "  Namespace: {}",
        config.watch_namespace.as_deref().unwrap_or("all namespaces")
    );
    info!("  Backup target setting: {}", config.backup_target_setting);
    info!("  Cache sync timeout: {}s", config.cache_sync_timeout.as_secs());

    let controller = Controller::new(config).await?;
    controller.run().await?;

    Ok(())
}
