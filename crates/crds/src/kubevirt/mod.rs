//! KubeVirt resources (`kubevirt.io/v1`)
//!
//! Only fields the action handlers read or write are modelled. Everything
//! else is carried in flattened `extra` maps so that a read-modify-write
//! cycle never drops data another controller owns.

pub mod instance;
pub mod migration;
pub mod subresources;
pub mod virtual_machine;

pub use instance::*;
pub use migration::*;
pub use subresources::*;
pub use virtual_machine::*;

/// API group shared by all KubeVirt resources
pub const KUBEVIRT_API_GROUP: &str = "kubevirt.io";

/// Kind of the KubeVirt VirtualMachine resource
pub const VIRTUAL_MACHINE_KIND: &str = "VirtualMachine";
