use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::filter::CompanyFilter;
use crate::middleware::{ensure_admin, ApiResponse, ApiResult, AuthUser};
use crate::models::{Company, CompanyUpdate, NewCompany};
use crate::state::AppState;
use crate::validation::{Checks, Validate};

impl Validate for NewCompany {
    fn validate(&self) -> Result<(), ApiError> {
        let mut checks = Checks::new();
        if self.handle != self.handle.to_lowercase() {
            checks.fail("handle", "must be lowercase");
        }
        checks
            .length("handle", Some(self.handle.as_str()), 1, 25)
            .length("name", Some(self.name.as_str()), 1, 100)
            .non_negative("numEmployees", self.num_employees)
            .url("logoUrl", self.logo_url.as_deref())
            .finish()
    }
}

impl Validate for CompanyUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        Checks::new()
            .length("name", self.name.as_deref(), 1, 100)
            .non_negative("numEmployees", self.num_employees)
            .url("logoUrl", self.logo_url.as_deref())
            .finish()
    }
}

/// POST /companies - admin only
pub async fn create(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    body: Result<Json<NewCompany>, JsonRejection>,
) -> ApiResult<Value> {
    ensure_admin(user.as_deref())?;
    let Json(data) = body?;
    data.validate()?;

    let company = Company::create(&state.pool, data).await?;
    Ok(ApiResponse::created(json!({ "company": company })))
}

/// GET /companies?name=&minEmployees=&maxEmployees=
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<CompanyFilter>, QueryRejection>,
) -> ApiResult<Value> {
    let Query(filter) = query?;
    filter.validate()?;

    let companies = Company::find_all(&state.pool, &filter).await?;
    Ok(ApiResponse::success(json!({ "companies": companies })))
}

/// GET /companies/:handle - company with its jobs
pub async fn get(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<Value> {
    let company = Company::get(&state.pool, &handle).await?;
    Ok(ApiResponse::success(json!({ "company": company })))
}

/// PATCH /companies/:handle - admin only
pub async fn update(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    user: Option<Extension<AuthUser>>,
    body: Result<Json<CompanyUpdate>, JsonRejection>,
) -> ApiResult<Value> {
    ensure_admin(user.as_deref())?;
    let Json(data) = body?;
    data.validate()?;

    let company = Company::update(&state.pool, &handle, data).await?;
    Ok(ApiResponse::success(json!({ "company": company })))
}

/// DELETE /companies/:handle - admin only
pub async fn remove(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    user: Option<Extension<AuthUser>>,
) -> ApiResult<Value> {
    ensure_admin(user.as_deref())?;
    Company::remove(&state.pool, &handle).await?;
    Ok(ApiResponse::success(json!({ "deleted": handle })))
}
