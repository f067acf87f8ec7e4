//! HTTP surface: application state, router, handlers, and error mapping.
//!
//! Task routes are nested under `/api/{owner}` and require a bearer token
//! resolving to that same owner. The service's error taxonomy maps onto
//! status codes here and nowhere else: validation failures become 400,
//! `NotFound` 404, `Forbidden` 403. The service checks existence before
//! ownership, so the 404-vs-403 distinction survives to the wire.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use taskdeck_core::{
    OwnerId, Task, TaskError, TaskFilter, TaskId, TaskPatch, TaskService, TaskStore,
};

use crate::auth::TokenKeys;
use crate::config::ServerConfig;
use crate::snapshot::{self, Snapshot, SnapshotError};
use crate::users::{User, UserError, UserRegistry};

/// Default page size when the `limit` query parameter is omitted.
const DEFAULT_LIST_LIMIT: usize = 100;

/// Shared application state: the task service, the user directory, token
/// keys, and the optional snapshot location.
#[derive(Clone)]
pub struct AppState {
    /// The task lifecycle engine.
    pub service: Arc<TaskService>,
    /// Registered users.
    pub users: Arc<UserRegistry>,
    /// Bearer token signing/verification keys.
    pub tokens: Arc<TokenKeys>,
    data_path: Option<PathBuf>,
}

impl AppState {
    /// Creates fresh in-memory state from a config, ignoring any snapshot.
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            service: Arc::new(TaskService::new()),
            users: Arc::new(UserRegistry::new()),
            tokens: Arc::new(TokenKeys::new(
                &config.token_secret,
                config.token_ttl_minutes,
            )),
            data_path: config.data_path.clone(),
        }
    }

    /// Creates state from a config, restoring the snapshot at the
    /// configured data path when one exists.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if an existing snapshot cannot be read
    /// or parsed.
    pub fn from_config(config: &ServerConfig) -> Result<Self, SnapshotError> {
        let snap = match &config.data_path {
            Some(path) => snapshot::load(path)?.unwrap_or_default(),
            None => Snapshot::default(),
        };
        Ok(Self {
            service: Arc::new(TaskService::with_store(TaskStore::from_parts(
                snap.tasks,
                snap.next_id,
            ))),
            users: Arc::new(UserRegistry::from_users(snap.users)),
            tokens: Arc::new(TokenKeys::new(
                &config.token_secret,
                config.token_ttl_minutes,
            )),
            data_path: config.data_path.clone(),
        })
    }

    /// Writes the current state to the snapshot file, if persistence is
    /// enabled. A failed save only logs a warning: the mutation that
    /// triggered it has already succeeded in memory.
    fn persist(&self) {
        let Some(path) = &self.data_path else {
            return;
        };
        let (tasks, next_id) = self.service.export();
        let snap = Snapshot {
            users: self.users.export(),
            tasks,
            next_id,
        };
        if let Err(e) = snapshot::save(path, &snap) {
            tracing::warn!(error = %e, "snapshot save failed — request succeeded but state was not persisted");
        }
    }
}

/// An API-level error: a status code plus a user-facing detail message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, detail)
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        let status = match &err {
            TaskError::InvalidTitle(_) | TaskError::InvalidDescription(_) => {
                StatusCode::BAD_REQUEST
            }
            TaskError::NotFound(_) => StatusCode::NOT_FOUND,
            TaskError::Forbidden(_) => StatusCode::FORBIDDEN,
            // Ids are store-allocated; a duplicate is a broken invariant.
            TaskError::DuplicateId(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        let status = match &err {
            UserError::EmailTaken => StatusCode::BAD_REQUEST,
            UserError::BadCredentials => StatusCode::UNAUTHORIZED,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(json!({ "detail": self.detail }))).into_response();
        if self.status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// The authenticated user, resolved from the `Authorization: Bearer`
/// header on every request that extracts it.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token =
            bearer_token(parts).ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;
        let user_id = state
            .tokens
            .verify(token)
            .map_err(|_| ApiError::unauthorized("Could not validate credentials"))?;
        let user = state
            .users
            .get(&user_id)
            .ok_or_else(|| ApiError::unauthorized("Could not validate credentials"))?;
        Ok(Self(user))
    }
}

/// Pulls the bearer token out of the `Authorization` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Gate between the authenticated user and the `{owner}` path segment.
/// The task service trusts the owner it is given, so the trust decision
/// happens here, once.
fn scope(auth: &AuthUser, owner: &str) -> Result<OwnerId, ApiError> {
    if auth.0.id == owner {
        Ok(OwnerId::from(owner))
    } else {
        Err(ApiError::new(
            StatusCode::FORBIDDEN,
            "Not authorized to access tasks for this user",
        ))
    }
}

// ---------------------------------------------------------------------------
// Request/response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SignupRequest {
    email: String,
    name: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    access_token: String,
    token_type: &'static str,
}

/// Public view of a user account — everything but the password hash.
#[derive(Debug, Serialize)]
struct UserResponse {
    id: String,
    email: String,
    name: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateTaskRequest {
    title: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ListParams {
    completed: Option<bool>,
    skip: Option<usize>,
    limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.users.signup(&req.email, &req.name, &req.password)?;
    tracing::info!(user_id = %user.id, "user registered");
    state.persist();
    Ok((StatusCode::CREATED, Json(user.into())))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = state.users.authenticate(&req.email, &req.password)?;
    let token = state.tokens.issue(&user.id).map_err(|e| {
        tracing::error!(error = %e, "token issue failed");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Could not issue token")
    })?;
    tracing::debug!(user_id = %user.id, "login succeeded");
    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer",
    }))
}

/// Tokens are stateless, so logout is a client-side affair; the endpoint
/// exists for API symmetry.
async fn logout() -> Json<serde_json::Value> {
    Json(json!({ "detail": "Successfully logged out" }))
}

async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(owner): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let owner = scope(&auth, &owner)?;
    let filter = TaskFilter {
        completed: params.completed,
        skip: params.skip.unwrap_or(0),
        limit: Some(params.limit.unwrap_or(DEFAULT_LIST_LIMIT)),
    };
    Ok(Json(state.service.list(&owner, &filter)))
}

async fn create_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(owner): Path<String>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let owner = scope(&auth, &owner)?;
    let task = state
        .service
        .add(&owner, &req.title, req.description.as_deref())?;
    tracing::info!(owner = %owner, task_id = %task.id, "task created");
    state.persist();
    Ok((StatusCode::CREATED, Json(task)))
}

async fn get_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((owner, id)): Path<(String, u64)>,
) -> Result<Json<Task>, ApiError> {
    let owner = scope(&auth, &owner)?;
    Ok(Json(state.service.get(&owner, TaskId::new(id))?))
}

async fn update_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((owner, id)): Path<(String, u64)>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let owner = scope(&auth, &owner)?;
    let task = state.service.update(
        &owner,
        TaskId::new(id),
        TaskPatch {
            title: req.title,
            description: req.description,
            completed: req.completed,
        },
    )?;
    state.persist();
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((owner, id)): Path<(String, u64)>,
) -> Result<StatusCode, ApiError> {
    let owner = scope(&auth, &owner)?;
    let task = state.service.delete(&owner, TaskId::new(id))?;
    tracing::info!(owner = %owner, task_id = %task.id, "task deleted");
    state.persist();
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((owner, id)): Path<(String, u64)>,
) -> Result<Json<Task>, ApiError> {
    let owner = scope(&auth, &owner)?;
    let task = state.service.toggle(&owner, TaskId::new(id))?;
    state.persist();
    Ok(Json(task))
}

// ---------------------------------------------------------------------------
// Router and server startup
// ---------------------------------------------------------------------------

/// Builds the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/{owner}", get(list_tasks).post(create_task))
        .route(
            "/api/{owner}/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/{owner}/{id}/complete", patch(toggle_task))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `addr` and serves the API on a background task.
///
/// Returns the bound address (useful with port 0) and the server task's
/// join handle.
///
/// # Errors
///
/// Returns an I/O error if the address cannot be bound.
pub async fn start_server(
    addr: &str,
    state: AppState,
) -> std::io::Result<(SocketAddr, tokio::task::JoinHandle<()>)> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;
    let app = router(state);
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "server task failed");
        }
    });
    Ok((bound_addr, handle))
}

/// Starts an in-memory server on an ephemeral port, for tests.
///
/// # Errors
///
/// Returns an I/O error if no ephemeral port can be bound.
pub async fn start_test_server() -> std::io::Result<(SocketAddr, tokio::task::JoinHandle<()>)> {
    let config = ServerConfig {
        data_path: None,
        token_secret: "test-secret".to_string(),
        ..ServerConfig::default()
    };
    start_server("127.0.0.1:0", AppState::new(&config)).await
}
