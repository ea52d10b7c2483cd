//! Well-known annotation and label keys
//!
//! Harvester stores several auxiliary lists and migration bookkeeping values
//! as string annotations on KubeVirt objects.

/// JSON-encoded list of PersistentVolumeClaim templates on a VirtualMachine
pub const ANNOTATION_VOLUME_CLAIM_TEMPLATES: &str = "harvesterhci.io/volumeClaimTemplates";

/// JSON-encoded list of SSH key names on the VM's instance template
pub const ANNOTATION_SSH_NAMES: &str = "harvesterhci.io/sshNames";

/// UID of the migration currently driving a VirtualMachineInstance
pub const ANNOTATION_MIGRATION_UID: &str = "harvesterhci.io/migrationUID";

/// Harvester's view of the migration state of a VirtualMachineInstance
pub const ANNOTATION_MIGRATION_STATE: &str = "harvesterhci.io/migrationState";

/// Node requested as the target of a migration
pub const ANNOTATION_MIGRATION_TARGET: &str = "harvesterhci.io/migrationTarget";

/// Well-known node hostname label, used as the migration node selector
pub const LABEL_HOSTNAME: &str = "kubernetes.io/hostname";
