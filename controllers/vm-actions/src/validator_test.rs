//! Unit tests for precondition checks

#[cfg(test)]
mod tests {
    use crate::error::ErrorCategory;
    use crate::test_utils::*;
    use crate::validator::*;
    use crds::{MigrationPhase, MigrationState, VmiPhase};

    #[test]
    fn test_validate_eject() {
        let vm = create_test_vm("default", "vm1", &[("rootdisk", false), ("cdrom1", true)]);

        assert!(validate_eject(&vm, &["cdrom1".to_string()]).is_ok());

        let err = validate_eject(&vm, &["cdrom2".to_string()]).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
        assert_eq!(err.to_string(), "disk cdrom2 not found in virtual machine default/vm1");
    }

    #[test]
    fn test_has_active_migration_sources() {
        let vmi = create_running_vmi("default", "vm1", "node1");
        assert!(!has_active_migration(&vmi, &[]));

        let annotated = with_migration_uid(vmi.clone(), "mig-1");
        assert!(has_active_migration(&annotated, &[]));

        let mut reported = vmi.clone();
        if let Some(status) = reported.status.as_mut() {
            status.migration_state = Some(MigrationState {
                migration_uid: Some("mig-1".to_string()),
                ..Default::default()
            });
        }
        assert!(has_active_migration(&reported, &[]));

        let other = create_test_migration("default", "m", "vm2", "mig-2", None);
        assert!(!has_active_migration(&vmi, &[other]));

        let unphased = create_test_migration("default", "m", "vm1", "mig-3", None);
        assert!(has_active_migration(&vmi, &[unphased]));

        let failed = create_test_migration("default", "m", "vm1", "mig-4", Some(MigrationPhase::Failed));
        assert!(!has_active_migration(&vmi, &[failed]));
    }

    #[test]
    fn test_finished_migration_state_does_not_block() {
        let mut vmi = create_running_vmi("default", "vm1", "node1");
        if let Some(status) = vmi.status.as_mut() {
            status.migration_state = Some(MigrationState {
                completed: Some(true),
                ..Default::default()
            });
        }
        assert!(validate_migrate(&vmi, &[]).is_ok());
    }

    #[test]
    fn test_validate_migrate_requires_running() {
        let vmi = create_test_vmi("default", "vm1", VmiPhase::Pending, "", &[]);

        let err = validate_migrate(&vmi, &[]).unwrap_err();

        assert_eq!(err.category(), ErrorCategory::IllegalState);
    }

    #[test]
    fn test_validate_migration_target() {
        let vmi = create_running_vmi("default", "vm1", "node1");

        assert!(validate_migration_target(&vmi, "node2").is_ok());
        assert_eq!(
            validate_migration_target(&vmi, "node1").unwrap_err().category(),
            ErrorCategory::InvalidInput
        );
    }

    #[test]
    fn test_find_abortable_migration_matches_uid() {
        let vmi = with_migration_uid(create_running_vmi("default", "vm1", "node1"), "mig-2");
        let migrations = vec![
            create_test_migration("default", "old", "vm1", "mig-1", Some(MigrationPhase::Failed)),
            create_test_migration("default", "current", "vm1", "mig-2", Some(MigrationPhase::Running)),
        ];

        let found = find_abortable_migration(&vmi, &migrations).unwrap();

        assert_eq!(found.metadata.name.as_deref(), Some("current"));
    }

    #[test]
    fn test_validate_remove_volume() {
        let vmi = create_test_vmi("default", "vm1", VmiPhase::Running, "node1", &["rootdisk", "data"]);

        assert!(validate_remove_volume(&vmi, "data").is_ok());
        assert_eq!(
            validate_remove_volume(&vmi, "scratch").unwrap_err().category(),
            ErrorCategory::NotFound
        );
    }
}
