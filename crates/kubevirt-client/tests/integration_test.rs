//! Integration tests for the KubeVirt client
//!
//! These tests require a cluster with KubeVirt and Harvester installed.
//! Set KUBECONFIG and TEST_VM_NAMESPACE / TEST_VM_NAME to run.

use kubevirt_client::{ClusterCache, KubeVirtClient, KubeVirtClientTrait, StoreError};
use std::time::Duration;

fn target() -> (String, String) {
    let namespace = std::env::var("TEST_VM_NAMESPACE").unwrap_or_else(|_| "default".to_string());
    let name = std::env::var("TEST_VM_NAME").expect("TEST_VM_NAME environment variable must be set");
    (namespace, name)
}

#[tokio::test]
#[ignore] // Requires a running cluster
async fn test_get_vm() {
    let (namespace, name) = target();
    let client = KubeVirtClient::new(kube::Client::try_default().await.expect("Failed to create client"));

    let vm = client.get_vm(&namespace, &name).await.expect("Failed to get VM");
    println!("VM {}/{} has {} disks", namespace, name, vm.disks().len());
}

#[tokio::test]
#[ignore]
async fn test_missing_vm_is_not_found() {
    let client = KubeVirtClient::new(kube::Client::try_default().await.expect("Failed to create client"));

    let err = client
        .get_vm("default", "does-not-exist-4f1c")
        .await
        .expect_err("VM should not exist");
    assert!(err.is_not_found(), "Expected NotFound, got {:?}", err);
}

#[tokio::test]
#[ignore]
async fn test_stale_update_conflicts() {
    let (namespace, name) = target();
    let client = KubeVirtClient::new(kube::Client::try_default().await.expect("Failed to create client"));

    let vm = client.get_vm(&namespace, &name).await.expect("Failed to get VM");
    let updated = client.update_vm(&vm).await.expect("Failed to update VM");
    assert_ne!(
        vm.metadata.resource_version, updated.metadata.resource_version,
        "Update should bump resourceVersion"
    );

    let err = client.update_vm(&vm).await.expect_err("Stale update should fail");
    assert!(err.is_conflict(), "Expected Conflict, got {:?}", err);
}

#[tokio::test]
#[ignore]
async fn test_cluster_cache_syncs() {
    let kube_client = kube::Client::try_default().await.expect("Failed to create client");
    let (cache, _tasks) = ClusterCache::start(kube_client.clone(), None);
    cache
        .wait_until_ready(Duration::from_secs(30))
        .await
        .expect("Caches should sync");

    let client = KubeVirtClient::new(kube_client).with_cache(cache);
    let setting = client.get_setting("backup-target").await;
    println!("backup-target setting: {:?}", setting.map(|s| s.is_configured()));
}

#[tokio::test]
#[ignore]
async fn test_list_migrations_in_missing_namespace() {
    let client = KubeVirtClient::new(kube::Client::try_default().await.expect("Failed to create client"));

    match client.list_migrations("does-not-exist-4f1c").await {
        Ok(migrations) => assert!(migrations.is_empty()),
        Err(err) => assert!(
            matches!(err, StoreError::NotFound { .. } | StoreError::Api { .. }),
            "Expected a classified API error, got {:?}",
            err
        ),
    }
}
