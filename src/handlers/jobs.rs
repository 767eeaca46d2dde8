use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::filter::JobFilter;
use crate::middleware::{ensure_admin, ApiResponse, ApiResult, AuthUser};
use crate::models::{Job, JobUpdate, NewJob};
use crate::state::AppState;
use crate::validation::{Checks, Validate};

fn check_equity(checks: &mut Checks, equity: Option<Decimal>) {
    if let Some(e) = equity {
        if e < Decimal::ZERO || e > Decimal::ONE {
            checks.fail("equity", "must be between 0 and 1.0");
        }
    }
}

impl Validate for NewJob {
    fn validate(&self) -> Result<(), ApiError> {
        let mut checks = Checks::new();
        check_equity(&mut checks, self.equity);
        checks
            .length("title", Some(self.title.as_str()), 1, 100)
            .non_negative("salary", self.salary)
            .length("companyHandle", Some(self.company_handle.as_str()), 1, 25)
            .finish()
    }
}

impl Validate for JobUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        let mut checks = Checks::new();
        check_equity(&mut checks, self.equity);
        checks
            .length("title", self.title.as_deref(), 1, 100)
            .non_negative("salary", self.salary)
            .finish()
    }
}

/// POST /jobs - admin only
pub async fn create(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    body: Result<Json<NewJob>, JsonRejection>,
) -> ApiResult<Value> {
    ensure_admin(user.as_deref())?;
    let Json(data) = body?;
    data.validate()?;

    let job = Job::create(&state.pool, data).await?;
    Ok(ApiResponse::created(json!({ "job": job })))
}

/// GET /jobs?title=&minSalary=&maxSalary=&hasEquity=
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<JobFilter>, QueryRejection>,
) -> ApiResult<Value> {
    let Query(filter) = query?;
    filter.validate()?;

    let jobs = Job::find_all(&state.pool, &filter).await?;
    Ok(ApiResponse::success(json!({ "jobs": jobs })))
}

/// GET /jobs/:id - job with its company
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = id?;
    let job = Job::get(&state.pool, id).await?;
    Ok(ApiResponse::success(json!({ "job": job })))
}

/// PATCH /jobs/:id - admin only
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    user: Option<Extension<AuthUser>>,
    body: Result<Json<JobUpdate>, JsonRejection>,
) -> ApiResult<Value> {
    ensure_admin(user.as_deref())?;
    let Path(id) = id?;
    let Json(data) = body?;
    data.validate()?;

    let job = Job::update(&state.pool, id, data).await?;
    Ok(ApiResponse::success(json!({ "job": job })))
}

/// DELETE /jobs/:id - admin only
pub async fn remove(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    user: Option<Extension<AuthUser>>,
) -> ApiResult<Value> {
    ensure_admin(user.as_deref())?;
    let Path(id) = id?;
    Job::remove(&state.pool, id).await?;
    Ok(ApiResponse::success(json!({ "deleted": id })))
}
