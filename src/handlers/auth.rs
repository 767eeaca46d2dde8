use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::create_token;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{NewUser, User};
use crate::state::AppState;
use crate::validation::{Checks, Validate};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

impl Validate for TokenRequest {
    fn validate(&self) -> Result<(), ApiError> {
        Checks::new()
            .length("username", Some(self.username.as_str()), 1, 25)
            .length("password", Some(self.password.as_str()), 1, 100)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Validate for RegisterRequest {
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

/// POST /auth/token - exchange credentials for a JWT
pub async fn token(
    State(state): State<AppState>,
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(req) = body?;
    req.validate()?;

    let user = User::authenticate(&state.pool, &req.username, &req.password).await?;
    let token = create_token(&user.username, user.is_admin)?;
    Ok(ApiResponse::success(json!({ "token": token })))
}

/// POST /auth/register - self-service signup; never grants admin
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(req) = body?;
    req.validate()?;

    let new_user = NewUser {
        username: req.username,
        password: req.password,
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        is_admin: false,
    };
    let user = User::register(&state.pool, new_user).await?;
    let token = create_token(&user.username, user.is_admin)?;
    Ok(ApiResponse::created(json!({ "token": token })))
}
