use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::auth::create_token;
use crate::error::ApiError;
use crate::middleware::{ensure_admin, ensure_correct_user_or_admin, ApiResponse, ApiResult, AuthUser};
use crate::models::{NewUser, User, UserUpdate};
use crate::state::AppState;
use crate::validation::{Checks, Validate};

impl Validate for NewUser {
    fn validate(&self) -> Result<(), ApiError> {
        Checks::new()
            .length("username", Some(self.username.as_str()), 1, 25)
            .length("password", Some(self.password.as_str()), 5, 20)
            .length("firstName", Some(self.first_name.as_str()), 1, 25)
            .length("lastName", Some(self.last_name.as_str()), 1, 25)
            .length("email", Some(self.email.as_str()), 6, 60)
            .email("email", Some(self.email.as_str()))
            .finish()
    }
}

impl Validate for UserUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        Checks::new()
            .length("firstName", self.first_name.as_deref(), 1, 25)
            .length("lastName", self.last_name.as_deref(), 1, 25)
            .length("password", self.password.as_deref(), 5, 20)
            .length("email", self.email.as_deref(), 6, 60)
            .email("email", self.email.as_deref())
            .finish()
    }
}

/// POST /users - admin only; may create other admins
pub async fn create(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<Value> {
    ensure_admin(user.as_deref())?;
    let Json(data) = body?;
    data.validate()?;

    let created = User::register(&state.pool, data).await?;
    let token = create_token(&created.username, created.is_admin)?;
    Ok(ApiResponse::created(json!({ "user": created, "token": token })))
}

/// GET /users - admin only
pub async fn list(State(state): State<AppState>, user: Option<Extension<AuthUser>>) -> ApiResult<Value> {
    ensure_admin(user.as_deref())?;
    let users = User::find_all(&state.pool).await?;
    Ok(ApiResponse::success(json!({ "users": users })))
}

/// GET /users/:username - admin or the user
pub async fn get(
    State(state): State<AppState>,
    Path(username): Path<String>,
    user: Option<Extension<AuthUser>>,
) -> ApiResult<Value> {
    ensure_correct_user_or_admin(user.as_deref(), &username)?;
    let detail = User::get(&state.pool, &username).await?;
    Ok(ApiResponse::success(json!({ "user": detail })))
}

/// PATCH /users/:username - admin or the user
pub async fn update(
    State(state): State<AppState>,
    Path(username): Path<String>,
    user: Option<Extension<AuthUser>>,
    body: Result<Json<UserUpdate>, JsonRejection>,
) -> ApiResult<Value> {
    ensure_correct_user_or_admin(user.as_deref(), &username)?;
    let Json(data) = body?;
    data.validate()?;

    let updated = User::update(&state.pool, &username, data).await?;
    Ok(ApiResponse::success(json!({ "user": updated })))
}

/// DELETE /users/:username - admin or the user
pub async fn remove(
    State(state): State<AppState>,
    Path(username): Path<String>,
    user: Option<Extension<AuthUser>>,
) -> ApiResult<Value> {
    ensure_correct_user_or_admin(user.as_deref(), &username)?;
    User::remove(&state.pool, &username).await?;
    Ok(ApiResponse::success(json!({ "deleted": username })))
}

/// POST /users/:username/jobs/:id - apply for a job
pub async fn apply(
    State(state): State<AppState>,
    path: Result<Path<(String, i32)>, PathRejection>,
    user: Option<Extension<AuthUser>>,
) -> ApiResult<Value> {
    let Path((username, job_id)) = path?;
    ensure_correct_user_or_admin(user.as_deref(), &username)?;
    User::apply_to_job(&state.pool, &username, job_id).await?;
    Ok(ApiResponse::success(json!({ "applied": job_id })))
}
