//! Unit tests for the HTTP surface

#[cfg(test)]
mod tests {
    use crate::error::ERROR_CATEGORY_HEADER;
    use crate::server::{router, AppState};
    use crate::test_utils::*;
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode};
    use axum::Router;
    use kubevirt_client::MockKubeVirtClient;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_router(client: &MockKubeVirtClient, backup_configured: bool) -> Router {
        router(AppState {
            orchestrator: Arc::new(create_test_orchestrator(client, backup_configured)),
        })
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn category(response: &Response<Body>) -> Option<&str> {
        response
            .headers()
            .get(ERROR_CATEGORY_HEADER)
            .and_then(|v| v.to_str().ok())
    }

    async fn body_text(response: Response<Body>) -> String {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_healthz() {
        let client = MockKubeVirtClient::new();
        let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();

        let response = test_router(&client, false).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_eject_returns_no_content_and_restarts_once() {
        let client = MockKubeVirtClient::new();
        client.add_vm(create_test_vm("default", "vm1", &[("cdrom1", true)]));

        let response = test_router(&client, false)
            .oneshot(post(
                "/v1/namespaces/default/virtualmachines/vm1?action=ejectCdRom",
                r#"{"diskNames":["cdrom1"]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(client.vm("default", "vm1").unwrap().disks().is_empty());
        let restarts = client
            .subresource_calls()
            .iter()
            .filter(|c| c.subresource == "restart")
            .count();
        assert_eq!(restarts, 1);
    }

    #[tokio::test]
    async fn test_migrate_with_empty_node_name() {
        let client = MockKubeVirtClient::new();
        client.add_vmi(create_running_vmi("default", "vm1", "node1"));

        let response = test_router(&client, false)
            .oneshot(post(
                "/v1/namespaces/default/virtualmachines/vm1?action=migrate",
                r#"{"nodeName":""}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let migrations = client.migrations("default");
        assert_eq!(migrations.len(), 1);
        assert_eq!(migrations[0].spec.vmi_name, "vm1");
        assert!(client.vmi("default", "vm1").unwrap().spec.node_selector.is_none());
    }

    #[tokio::test]
    async fn test_unknown_action_is_unprocessable() {
        let client = MockKubeVirtClient::new();

        let response = test_router(&client, false)
            .oneshot(post("/v1/namespaces/default/virtualmachines/vm1?action=explode", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(category(&response), Some("InvalidInput"));
        assert_eq!(body_text(response).await, "Unsupported action");
    }

    #[tokio::test]
    async fn test_missing_action_is_unprocessable() {
        let client = MockKubeVirtClient::new();

        let response = test_router(&client, false)
            .oneshot(post("/v1/namespaces/default/virtualmachines/vm1", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_error_categories_map_to_statuses() {
        let client = MockKubeVirtClient::new();
        client.add_vm(create_test_vm("default", "vm1", &[("rootdisk", false)]));
        client.add_vmi(create_test_vmi(
            "default",
            "stopped",
            crds::VmiPhase::Scheduling,
            "node1",
            &[],
        ));
        let app = test_router(&client, false);

        let cases = [
            (
                "/v1/namespaces/default/virtualmachines/ghost?action=start",
                "",
                StatusCode::NOT_FOUND,
                "NotFound",
            ),
            (
                "/v1/namespaces/default/virtualmachines/stopped?action=migrate",
                "",
                StatusCode::CONFLICT,
                "IllegalState",
            ),
            (
                "/v1/namespaces/default/virtualmachines/vm1?action=backup",
                r#"{"name":"nightly"}"#,
                StatusCode::PRECONDITION_FAILED,
                "PreconditionFailed",
            ),
            (
                "/v1/namespaces/default/virtualmachines/vm1?action=ejectCdRom",
                r#"{"diskNames":["rootdisk"]}"#,
                StatusCode::UNPROCESSABLE_ENTITY,
                "InvalidInput",
            ),
        ];

        for (uri, body, status, expected) in cases {
            let response = app.clone().oneshot(post(uri, body)).await.unwrap();
            assert_eq!(response.status(), status, "{}", uri);
            assert_eq!(category(&response), Some(expected), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_conflict_and_partial_failure_statuses() {
        let client = MockKubeVirtClient::new();
        client.add_vm(create_test_vm("default", "vm1", &[("cdrom1", true), ("cdrom2", true)]));
        let app = test_router(&client, false);

        client.conflict_on("update_vm");
        let response = app
            .clone()
            .oneshot(post(
                "/v1/namespaces/default/virtualmachines/vm1?action=ejectCdRom",
                r#"{"diskNames":["cdrom1"]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(category(&response), Some("Conflict"));

        client.clear_failures();
        client.fail_on("restart");
        let response = app
            .oneshot(post(
                "/v1/namespaces/default/virtualmachines/vm1?action=ejectCdRom",
                r#"{"diskNames":["cdrom1"]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(category(&response), Some("PartialFailure"));
    }

    #[tokio::test]
    async fn test_volume_export_returns_ok() {
        let client = MockKubeVirtClient::new();
        client.add_claim(create_test_claim("default", "pvc-data", Some("pvc-1234")));

        let response = test_router(&client, false)
            .oneshot(post(
                "/v1/namespaces/default/volumes/pvc-data?action=export",
                r#"{"diskName":"data","volumeSourceName":"pvc-data"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(client.backing_images().len(), 1);
    }

    #[tokio::test]
    async fn test_volume_unknown_action_is_unprocessable() {
        let client = MockKubeVirtClient::new();

        let response = test_router(&client, false)
            .oneshot(post("/v1/namespaces/default/volumes/pvc-data?action=clone", "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(category(&response), Some("InvalidInput"));
    }
}
