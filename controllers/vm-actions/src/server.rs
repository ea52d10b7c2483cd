//! HTTP surface of the action server.
//!
//! Routes:
//! - `POST /v1/namespaces/{namespace}/virtualmachines/{name}?action=<action>`
//! - `POST /v1/namespaces/{namespace}/volumes/{name}?action=export`
//! - `GET /healthz`
//!
//! Successful VM actions answer 204 and volume export answers 200. Failures
//! carry the HTTP status of their category and the `x-error-category` header.

use crate::action::{VmAction, VolumeAction};
use crate::error::ActionError;
use crate::orchestrator::ActionOrchestrator;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state for handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub orchestrator: Arc<ActionOrchestrator>,
}

#[derive(Debug, Default, Deserialize)]
struct ActionQuery {
    #[serde(default)]
    action: String,
}

/// Build the router for `state`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route(
            "/v1/namespaces/{namespace}/virtualmachines/{name}",
            post(vm_action_handler),
        )
        .route(
            "/v1/namespaces/{namespace}/volumes/{name}",
            post(volume_action_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn vm_action_handler(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
    Query(query): Query<ActionQuery>,
    body: Bytes,
) -> Result<StatusCode, ActionError> {
    let action = VmAction::decode(&query.action, &body)?;
    state.orchestrator.execute(&namespace, &name, action).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn volume_action_handler(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
    Query(query): Query<ActionQuery>,
    body: Bytes,
) -> Result<StatusCode, ActionError> {
    let action = VolumeAction::decode(&query.action, &body)?;
    state
        .orchestrator
        .execute_volume(&namespace, &name, action)
        .await?;
    Ok(StatusCode::OK)
}

/// Serve `app` on `addr` until the listener fails
pub async fn serve(addr: SocketAddr, app: Router) -> Result<(), ActionError> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Starting VM action server");
    axum::serve(listener, app).await?;
    Ok(())
}
