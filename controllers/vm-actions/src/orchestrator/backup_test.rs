//! Unit tests for backup and restore

#[cfg(test)]
mod tests {
    use crate::action::{BackupInput, RestoreInput, VmAction};
    use crate::backup_target::{BackupTargetSource, SettingBackupTarget};
    use crate::error::ErrorCategory;
    use crate::orchestrator::ActionOrchestrator;
    use crate::test_utils::*;
    use crds::{BACKUP_TARGET_SETTING_NAME, TargetType, VIRTUAL_MACHINE_KIND};
    use kube::ResourceExt;
    use kubevirt_client::MockKubeVirtClient;
    use std::sync::Arc;

    const S3_TARGET: &str =
        r#"{"type":"s3","endpoint":"https://s3.example.com","bucketName":"backups","bucketRegion":"us-east-1"}"#;

    fn backup(name: &str) -> VmAction {
        VmAction::Backup(BackupInput {
            name: name.to_string(),
        })
    }

    fn restore(name: &str, backup_name: &str) -> VmAction {
        VmAction::Restore(RestoreInput {
            name: name.to_string(),
            backup_name: backup_name.to_string(),
        })
    }

    #[tokio::test]
    async fn test_backup_creates_backup_of_vm() {
        let client = MockKubeVirtClient::new();
        client.add_vm(create_test_vm("default", "vm1", &[("rootdisk", false)]));
        let orchestrator = create_test_orchestrator(&client, true);

        orchestrator.execute("default", "vm1", backup("nightly")).await.unwrap();

        let backups = client.backups("default");
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].name_any(), "nightly");
        assert_eq!(backups[0].spec.source.kind, VIRTUAL_MACHINE_KIND);
        assert_eq!(backups[0].spec.source.name, "vm1");
    }

    #[tokio::test]
    async fn test_backup_without_target_is_precondition_failed() {
        let client = MockKubeVirtClient::new();
        client.add_vm(create_test_vm("default", "vm1", &[]));
        let orchestrator = create_test_orchestrator(&client, false);

        let err = orchestrator
            .execute("default", "vm1", backup("nightly"))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::PreconditionFailed);
        assert_eq!(err.to_string(), "backup target is invalid");
        assert!(client.backups("default").is_empty());
    }

    #[tokio::test]
    async fn test_backup_name_taken_is_conflict() {
        let client = MockKubeVirtClient::new();
        client.add_backup(create_test_backup("default", "nightly", "vm0"));
        let orchestrator = create_test_orchestrator(&client, true);

        let err = orchestrator
            .execute("default", "vm1", backup("nightly"))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Conflict);
        assert!(err.to_string().starts_with("failed to create VM backup, "));
    }

    #[tokio::test]
    async fn test_restore_creates_in_place_restore() {
        let client = MockKubeVirtClient::new();
        client.add_backup(create_test_backup("default", "nightly", "vm1"));
        let orchestrator = create_test_orchestrator(&client, true);

        orchestrator
            .execute("default", "vm1", restore("restore-1", "nightly"))
            .await
            .unwrap();

        let restores = client.restores("default");
        assert_eq!(restores.len(), 1);
        assert_eq!(restores[0].name_any(), "restore-1");
        assert_eq!(restores[0].spec.target.name, "vm1");
        assert_eq!(restores[0].spec.virtual_machine_backup_name, "nightly");
        assert!(!restores[0].spec.new_vm);
    }

    #[tokio::test]
    async fn test_restore_missing_backup_is_not_found() {
        let client = MockKubeVirtClient::new();
        let orchestrator = create_test_orchestrator(&client, true);

        let err = orchestrator
            .execute("default", "vm1", restore("restore-1", "nightly"))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(client.restores("default").is_empty());
    }

    #[tokio::test]
    async fn test_restore_without_target_is_precondition_failed() {
        let client = MockKubeVirtClient::new();
        client.add_backup(create_test_backup("default", "nightly", "vm1"));
        let orchestrator = create_test_orchestrator(&client, false);

        let err = orchestrator
            .execute("default", "vm1", restore("restore-1", "nightly"))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::PreconditionFailed);
        assert!(client.restores("default").is_empty());
    }

    #[tokio::test]
    async fn test_restore_store_failure_keeps_context() {
        let client = MockKubeVirtClient::new();
        client.add_backup(create_test_backup("default", "nightly", "vm1"));
        client.fail_on("create_restore");
        let orchestrator = create_test_orchestrator(&client, true);

        let err = orchestrator
            .execute("default", "vm1", restore("restore-1", "nightly"))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(err.to_string().starts_with("failed to create restore, "));
    }

    #[tokio::test]
    async fn test_setting_backup_target_configured() {
        let client = MockKubeVirtClient::new();
        client.add_setting(create_backup_target_setting(S3_TARGET, true));
        let source = SettingBackupTarget::new(Arc::new(client), BACKUP_TARGET_SETTING_NAME);

        let (configured, target) = source.backup_target().await;

        assert!(configured);
        let target = target.unwrap();
        assert_eq!(target.target_type, TargetType::S3);
        assert_eq!(target.endpoint, "https://s3.example.com");
    }

    #[tokio::test]
    async fn test_setting_backup_target_not_applied() {
        let client = MockKubeVirtClient::new();
        client.add_setting(create_backup_target_setting(S3_TARGET, false));
        let source = SettingBackupTarget::new(Arc::new(client), BACKUP_TARGET_SETTING_NAME);

        let (configured, _) = source.backup_target().await;

        assert!(!configured);
    }

    #[tokio::test]
    async fn test_setting_backup_target_lookup_failure_is_not_configured() {
        let client = MockKubeVirtClient::new();
        client.add_setting(create_backup_target_setting(S3_TARGET, true));
        client.fail_on("get_setting");
        let source = SettingBackupTarget::new(Arc::new(client), BACKUP_TARGET_SETTING_NAME);

        assert_eq!(source.backup_target().await, (false, None));
    }

    #[tokio::test]
    async fn test_backup_through_setting_source() {
        let client = MockKubeVirtClient::new();
        let shared = Arc::new(client.clone());
        let orchestrator = ActionOrchestrator::new(
            shared.clone(),
            Arc::new(SettingBackupTarget::new(shared, BACKUP_TARGET_SETTING_NAME)),
        );

        let err = orchestrator
            .execute("default", "vm1", backup("nightly"))
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::PreconditionFailed);

        client.add_setting(create_backup_target_setting(S3_TARGET, true));
        orchestrator.execute("default", "vm1", backup("nightly")).await.unwrap();
        assert_eq!(client.backups("default").len(), 1);
    }
}
