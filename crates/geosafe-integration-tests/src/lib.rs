//! In-process GeoSafe report service.
//!
//! A small axum server speaking the report service's HTTP API, used to
//! drive the real sync client end to end:
//!
//! - `GET /reports` - every report
//! - `POST /report` - create from a draft; admin drafts start approved
//! - `POST /report/:id/approve` - quorum approval
//! - `DELETE /report/:id` - admin only
//!
//! The acting user comes from the `X-User-Info` header. The server can be
//! switched offline, in which case every route answers 503.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use geosafe_consensus::{open_report, ApprovalPolicy, ApprovalRejection};
use geosafe_model::{Identity, Report, ReportDraft, USER_INFO_HEADER};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

/// Server-side report state.
#[derive(Debug, Default)]
pub struct ServiceState {
    pub reports: Vec<Report>,
    pub offline: bool,
    pub policy: ApprovalPolicy,
    next_id: u64,
}

type AppState = Arc<RwLock<ServiceState>>;

/// Build the service router over shared state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/reports", get(list_reports))
        .route("/report", post(create_report))
        .route("/report/:id/approve", post(approve_report))
        .route("/report/:id", delete(delete_report))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A running service bound to an ephemeral local port.
pub struct ReferenceServer {
    addr: SocketAddr,
    state: AppState,
    task: JoinHandle<()>,
}

impl ReferenceServer {
    /// Bind `127.0.0.1:0` and serve in the background.
    pub async fn spawn() -> std::io::Result<Self> {
        let state: AppState = Arc::new(RwLock::new(ServiceState::default()));
        let app = build_router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tracing::info!("Report service listening on {}", addr);

        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Report service error: {}", e);
            }
        });

        Ok(Self { addr, state, task })
    }

    /// Base URL for clients.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn set_offline(&self, offline: bool) {
        self.state.write().await.offline = offline;
    }

    pub async fn set_policy(&self, policy: ApprovalPolicy) {
        self.state.write().await.policy = policy;
    }

    /// Replace the server's reports.
    pub async fn seed(&self, reports: Vec<Report>) {
        self.state.write().await.reports = reports;
    }

    /// Server-side copy of every report.
    pub async fn reports(&self) -> Vec<Report> {
        self.state.read().await.reports.clone()
    }
}

impl Drop for ReferenceServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// --- Helpers ---

fn actor(headers: &HeaderMap) -> Result<Identity, StatusCode> {
    let raw = headers
        .get(USER_INFO_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    Identity::from_header_value(raw).map_err(|_| StatusCode::UNAUTHORIZED)
}

fn ensure_online(state: &ServiceState) -> Result<(), StatusCode> {
    if state.offline {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    } else {
        Ok(())
    }
}

// --- Report endpoints ---

async fn list_reports(State(state): State<AppState>) -> Result<Json<Vec<Report>>, StatusCode> {
    let state = state.read().await;
    ensure_online(&state)?;
    Ok(Json(state.reports.clone()))
}

async fn create_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<ReportDraft>,
) -> Result<(StatusCode, Json<Report>), StatusCode> {
    let mut state = state.write().await;
    ensure_online(&state)?;
    let creator = actor(&headers)?;
    draft.validate().map_err(|_| StatusCode::BAD_REQUEST)?;

    state.next_id += 1;
    let report = open_report(format!("r{}", state.next_id), draft, &creator);
    state.reports.push(report.clone());

    Ok((StatusCode::CREATED, Json(report)))
}

async fn approve_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Report>, (StatusCode, String)> {
    let mut state = state.write().await;
    ensure_online(&state).map_err(|s| (s, String::new()))?;
    let approver = actor(&headers).map_err(|s| (s, String::new()))?;

    let policy = state.policy;
    let report = state
        .reports
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or((StatusCode::NOT_FOUND, format!("no report {}", id)))?;

    let updated = policy
        .apply(report, &approver)
        .map_err(|e: ApprovalRejection| (StatusCode::CONFLICT, e.to_string()))?;
    *report = updated.clone();

    Ok(Json(updated))
}

async fn delete_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> StatusCode {
    let mut state = state.write().await;
    if state.offline {
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    match actor(&headers) {
        Ok(identity) if identity.is_admin => {}
        Ok(_) => return StatusCode::FORBIDDEN,
        Err(status) => return status,
    }

    let before = state.reports.len();
    state.reports.retain(|r| r.id != id);
    if state.reports.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}
