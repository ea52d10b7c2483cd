//! Unit tests for CD-ROM eject

#[cfg(test)]
mod tests {
    use crate::action::{EjectCdRomInput, VmAction};
    use crate::annotations::{claim_template_name, decode_claim_templates};
    use crate::error::ErrorCategory;
    use crate::test_utils::*;
    use crds::ANNOTATION_VOLUME_CLAIM_TEMPLATES;
    use kube::ResourceExt;
    use kubevirt_client::{MockKubeVirtClient, SubresourceCall};

    fn eject(disks: &[&str]) -> VmAction {
        VmAction::EjectCdRom(EjectCdRomInput {
            disk_names: disks.iter().map(|d| d.to_string()).collect(),
        })
    }

    fn restart_call(name: &str) -> SubresourceCall {
        SubresourceCall {
            resource: "virtualmachines".to_string(),
            namespace: "default".to_string(),
            name: name.to_string(),
            subresource: "restart".to_string(),
            body: None,
        }
    }

    #[tokio::test]
    async fn test_eject_only_cdrom_empties_vm_and_restarts_once() {
        let client = MockKubeVirtClient::new();
        client.add_vm(create_test_vm("default", "vm1", &[("cdrom1", true)]));
        let orchestrator = create_test_orchestrator(&client, false);

        orchestrator
            .execute("default", "vm1", eject(&["cdrom1"]))
            .await
            .unwrap();

        let vm = client.vm("default", "vm1").unwrap();
        assert!(vm.disks().is_empty());
        assert!(vm.volumes().is_empty());
        assert_eq!(
            vm.annotations().get(ANNOTATION_VOLUME_CLAIM_TEMPLATES).map(String::as_str),
            Some("[]")
        );
        assert_eq!(client.subresource_calls(), vec![restart_call("vm1")]);
    }

    #[tokio::test]
    async fn test_eject_keeps_other_disks_and_their_claim_templates() {
        let client = MockKubeVirtClient::new();
        client.add_vm(create_test_vm(
            "default",
            "vm1",
            &[("rootdisk", false), ("cdrom1", true), ("cdrom2", true)],
        ));
        let orchestrator = create_test_orchestrator(&client, false);

        orchestrator
            .execute("default", "vm1", eject(&["cdrom1"]))
            .await
            .unwrap();

        let vm = client.vm("default", "vm1").unwrap();
        let disks: Vec<&str> = vm.disks().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(disks, vec!["rootdisk", "cdrom2"]);
        let volumes: Vec<&str> = vm.volumes().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(volumes, vec!["rootdisk", "cdrom2"]);

        let raw = vm.annotations().get(ANNOTATION_VOLUME_CLAIM_TEMPLATES).unwrap();
        let claims: Vec<String> = decode_claim_templates(raw)
            .unwrap()
            .iter()
            .filter_map(claim_template_name)
            .map(str::to_string)
            .collect();
        assert_eq!(claims, vec![claim_name("vm1", "rootdisk"), claim_name("vm1", "cdrom2")]);
    }

    #[tokio::test]
    async fn test_eject_non_cdrom_is_rejected_without_writes() {
        let client = MockKubeVirtClient::new();
        client.add_vm(create_test_vm("default", "vm1", &[("rootdisk", false), ("cdrom1", true)]));
        let before = client.vm("default", "vm1").unwrap();
        let orchestrator = create_test_orchestrator(&client, false);

        let err = orchestrator
            .execute("default", "vm1", eject(&["cdrom1", "rootdisk"]))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::InvalidInput);
        assert_eq!(err.to_string(), "disk rootdisk isn't a CD-ROM disk");
        assert_eq!(client.vm("default", "vm1").unwrap(), before);
        assert!(client.subresource_calls().is_empty());
    }

    #[tokio::test]
    async fn test_eject_unknown_disk_is_rejected() {
        let client = MockKubeVirtClient::new();
        client.add_vm(create_test_vm("default", "vm1", &[("cdrom1", true)]));
        let orchestrator = create_test_orchestrator(&client, false);

        let err = orchestrator
            .execute("default", "vm1", eject(&["cdrom9"]))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::InvalidInput);
        assert!(err.to_string().contains("cdrom9"));
        assert!(client.subresource_calls().is_empty());
    }

    #[tokio::test]
    async fn test_eject_twice_restarts_once() {
        let client = MockKubeVirtClient::new();
        client.add_vm(create_test_vm("default", "vm1", &[("rootdisk", false), ("cdrom1", true)]));
        let orchestrator = create_test_orchestrator(&client, false);

        orchestrator
            .execute("default", "vm1", eject(&["cdrom1"]))
            .await
            .unwrap();
        let after_first = client.vm("default", "vm1").unwrap();

        let err = orchestrator
            .execute("default", "vm1", eject(&["cdrom1"]))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::InvalidInput);
        assert_eq!(client.vm("default", "vm1").unwrap(), after_first);
        assert_eq!(client.subresource_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_eject_missing_vm_is_not_found() {
        let client = MockKubeVirtClient::new();
        let orchestrator = create_test_orchestrator(&client, false);

        let err = orchestrator
            .execute("default", "ghost", eject(&["cdrom1"]))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[tokio::test]
    async fn test_eject_conflict_skips_restart() {
        let client = MockKubeVirtClient::new();
        client.add_vm(create_test_vm("default", "vm1", &[("cdrom1", true)]));
        client.conflict_on("update_vm");
        let orchestrator = create_test_orchestrator(&client, false);

        let err = orchestrator
            .execute("default", "vm1", eject(&["cdrom1"]))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Conflict);
        assert_eq!(client.vm("default", "vm1").unwrap().disks().len(), 1);
        assert!(client.subresource_calls().is_empty());
    }

    #[tokio::test]
    async fn test_eject_restart_failure_is_partial() {
        let client = MockKubeVirtClient::new();
        client.add_vm(create_test_vm("default", "vm1", &[("cdrom1", true)]));
        client.fail_on("restart");
        let orchestrator = create_test_orchestrator(&client, false);

        let err = orchestrator
            .execute("default", "vm1", eject(&["cdrom1"]))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::PartialFailure);
        // The update stays committed
        assert!(client.vm("default", "vm1").unwrap().disks().is_empty());
        assert_eq!(client.subresource_calls(), vec![restart_call("vm1")]);
    }
}
