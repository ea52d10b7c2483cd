//! VM action CRD definitions
//!
//! Typed views of the Kubernetes resources the VM action server reads and
//! writes:
//! - `kubevirt.io/v1`: VirtualMachine, VirtualMachineInstance and
//!   VirtualMachineInstanceMigration, plus the subresource payloads
//! - `harvesterhci.io/v1beta1`: backups, restores, templates and settings
//! - `longhorn.io/v1beta1`: backing images used for volume export
//!
//! None of these CRDs are owned by this project, so schema generation is
//! disabled on every derive.

pub mod annotations;
pub mod harvester;
pub mod kubevirt;
pub mod longhorn;
pub mod references;

pub use annotations::*;
pub use harvester::*;
pub use kubevirt::*;
pub use longhorn::*;
pub use references::*;
