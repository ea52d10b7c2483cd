//! KubeVirt object store client
//!
//! A typed client for the KubeVirt and Harvester resources the VM action
//! server reads and writes, built on kube-rs.
//!
//! # Example
//!
//! ```no_run
//! use kubevirt_client::{KubeVirtClient, KubeVirtClientTrait};
//! use crds::VmOperation;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let kube_client = kube::Client::try_default().await?;
//! let client = KubeVirtClient::new(kube_client);
//!
//! // Read a VM and restart it
//! let vm = client.get_vm("default", "vm1").await?;
//! println!("{} has {} disks", "vm1", vm.disks().len());
//! client.vm_subresource("default", "vm1", VmOperation::Restart).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Optimistic concurrency**: updates carry the observed resource version;
//!   conflicts surface as [`StoreError::Conflict`]
//! - **Subresources**: start/stop/restart, pause/unpause, volume hot-plug
//! - **Read-through caches**: nodes, claims and backups served from
//!   kube-runtime reflectors when a [`ClusterCache`] is attached
//! - **Mocking**: an in-memory [`MockKubeVirtClient`] behind `test-util`

pub mod cache;
pub mod client;
pub mod error;
#[path = "trait.rs"]
pub mod kubevirt_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use cache::ClusterCache;
pub use client::KubeVirtClient;
pub use error::StoreError;
pub use kubevirt_trait::KubeVirtClientTrait;
#[cfg(feature = "test-util")]
pub use mock::{MockKubeVirtClient, SubresourceCall};
