#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

pub const ADMIN_EMAIL: &str = "admin@student.nurulfikri.ac.id";
pub const ADMIN_PASSWORD: &str = "correct-horse";
pub const ADMIN_TOKEN: &str = "test-token";

/// Shared state of the fake PEMIRA backend: a candidate table plus a log of
/// every request it served ("METHOD /path?query").
#[derive(Default)]
pub struct BackendState {
    pub candidates: Mutex<Vec<Value>>,
    pub requests: Mutex<Vec<String>>,
    pub role: Mutex<String>,
}

pub struct MockBackend {
    pub state: Arc<BackendState>,
    pub base_url: String,
}

impl MockBackend {
    /// Role the login endpoint reports for the admin user.
    pub fn set_role(&self, role: &str) {
        *self.state.role.lock().unwrap() = role.to_string();
    }

    pub fn seed_candidate(&self, id: &str, order_number: u32, name: &str, deleted: bool) {
        let deleted_at = deleted.then(|| Utc::now().to_rfc3339());
        self.state.candidates.lock().unwrap().push(json!({
            "id": id,
            "orderNumber": order_number,
            "name": name,
            "vision": "Vision",
            "mission": "Mission",
            "photoUrl": null,
            "deletedAt": deleted_at,
        }));
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn clear_requests(&self) {
        self.state.requests.lock().unwrap().clear();
    }
}

pub async fn spawn_backend() -> MockBackend {
    let state = Arc::new(BackendState::default());
    *state.role.lock().unwrap() = "super_admin".to_string();

    let app = router(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock backend");
    });

    MockBackend { state, base_url: format!("http://{}", addr) }
}

fn router(state: Arc<BackendState>) -> Router {
    Router::new()
        .route("/auth/admin-login", post(admin_login))
        .route("/candidates", get(list_candidates).post(create_candidate))
        .route("/candidates/:id", put(update_candidate).delete(soft_delete_candidate))
        .route("/candidates/:id/restore", post(restore_candidate))
        .route("/candidates/:id/permanent", delete(permanent_delete_candidate))
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .with_state(state)
}

async fn record_request(
    State(state): State<Arc<BackendState>>,
    req: Request,
    next: Next,
) -> Response {
    let target = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    state
        .requests
        .lock()
        .unwrap()
        .push(format!("{} {}", req.method(), target));
    next.run(req).await
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value == format!("Bearer {}", ADMIN_TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Missing or invalid token" })),
    )
        .into_response()
}

async fn admin_login(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<Value>,
) -> Response {
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();

    if email != ADMIN_EMAIL || password != ADMIN_PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response();
    }

    let role = state.role.lock().unwrap().clone();
    Json(json!({
        "token": ADMIN_TOKEN,
        "user": { "id": "admin-1", "role": role },
    }))
    .into_response()
}

#[derive(Deserialize)]
struct ListQuery {
    #[serde(rename = "includeDeleted", default)]
    include_deleted: bool,
}

async fn list_candidates(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let candidates: Vec<Value> = state
        .candidates
        .lock()
        .unwrap()
        .iter()
        .filter(|candidate| query.include_deleted || candidate["deletedAt"].is_null())
        .cloned()
        .collect();
    Json(candidates).into_response()
}

async fn create_candidate(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let record = json!({
        "id": uuid::Uuid::new_v4().to_string(),
        "orderNumber": body["orderNumber"],
        "name": body["name"],
        "vision": body["vision"],
        "mission": body["mission"],
        "photoUrl": body.get("photoUrl").cloned().unwrap_or(Value::Null),
        "deletedAt": null,
    });
    state.candidates.lock().unwrap().push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn update_candidate(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut candidates = state.candidates.lock().unwrap();
    match candidates.iter_mut().find(|candidate| candidate["id"] == id.as_str()) {
        Some(candidate) => {
            for key in ["orderNumber", "name", "vision", "mission", "photoUrl"] {
                if let Some(value) = body.get(key) {
                    candidate[key] = value.clone();
                }
            }
            Json(candidate.clone()).into_response()
        }
        None => not_found(&id),
    }
}

async fn soft_delete_candidate(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut candidates = state.candidates.lock().unwrap();
    match candidates.iter_mut().find(|candidate| candidate["id"] == id.as_str()) {
        Some(candidate) => {
            candidate["deletedAt"] = json!(Utc::now().to_rfc3339());
            Json(json!({ "message": "Candidate soft-deleted" })).into_response()
        }
        None => not_found(&id),
    }
}

async fn restore_candidate(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut candidates = state.candidates.lock().unwrap();
    match candidates.iter_mut().find(|candidate| candidate["id"] == id.as_str()) {
        Some(candidate) => {
            candidate["deletedAt"] = Value::Null;
            Json(json!({ "message": "Candidate restored" })).into_response()
        }
        None => not_found(&id),
    }
}

async fn permanent_delete_candidate(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut candidates = state.candidates.lock().unwrap();
    let before = candidates.len();
    candidates.retain(|candidate| candidate["id"] != id.as_str());
    if candidates.len() == before {
        return not_found(&id);
    }
    Json(json!({ "message": "Candidate permanently deleted" })).into_response()
}

fn not_found(id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("candidate {} not found", id) })),
    )
        .into_response()
}
