#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use tokio::sync::{Mutex, MutexGuard};
use tower::ServiceExt;

use jobly_api::models::{NewUser, User};
use jobly_api::{app, auth, AppState};

static INIT: Once = Once::new();

// Store-backed tests share one database; run them one at a time
static DB_LOCK: Mutex<()> = Mutex::const_new(());

/// Must run before anything reads the global config.
pub fn init_env() {
    INIT.call_once(|| {
        std::env::set_var("APP_ENV", "test");
    });
}

pub fn token(username: &str, is_admin: bool) -> String {
    init_env();
    auth::create_token(username, is_admin).expect("test token")
}

pub fn u1_token() -> String {
    token("u1", false)
}

pub fn u2_token() -> String {
    token("u2", false)
}

pub fn admin_token() -> String {
    token("admin", true)
}

/// Router over a pool that never connects. Only for requests that must be
/// answered before touching the store.
pub fn lazy_app() -> Router {
    init_env();
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://jobly@127.0.0.1:1/jobly_unreachable")
        .expect("lazy pool");
    app(AppState::new(pool))
}

pub struct Fixture {
    pub app: Router,
    pub pool: PgPool,
    /// Ids of j1..j4 in insertion order
    pub job_ids: Vec<i32>,
    _guard: MutexGuard<'static, ()>,
}

/// Fresh schema and fixture rows, or `None` when no test database is configured.
pub async fn seeded() -> Result<Option<Fixture>> {
    init_env();
    let url = match std::env::var("DATABASE_TEST_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_TEST_URL not set; skipping store-backed test");
            return Ok(None);
        }
    };

    let guard = DB_LOCK.lock().await;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .context("failed to connect to test database")?;

    pool.execute(include_str!("../../schema.sql")).await?;
    pool.execute("TRUNCATE applications, jobs, users, companies RESTART IDENTITY CASCADE")
        .await?;
    pool.execute(
        "INSERT INTO companies (handle, name, num_employees, description, logo_url) VALUES \
         ('c1', 'C1', 1, 'Desc1', 'http://c1.img'), \
         ('c2', 'C2', 2, 'Desc2', 'http://c2.img'), \
         ('c3', 'C3', 3, 'Desc3', 'http://c3.img')",
    )
    .await?;

    let job_ids: Vec<i32> = sqlx::query_scalar(
        "INSERT INTO jobs (title, salary, equity, company_handle) VALUES \
         ('j1', 100, 0.1, 'c1'), ('j2', 200, 0.2, 'c1'), ('j3', 300, 0, 'c1'), ('j4', NULL, NULL, 'c1') \
         RETURNING id",
    )
    .fetch_all(&pool)
    .await?;

    for name in ["u1", "u2"] {
        User::register(
            &pool,
            NewUser {
                username: name.to_string(),
                password: format!("password{}", &name[1..]),
                first_name: format!("{}F", name.to_uppercase()),
                last_name: format!("{}L", name.to_uppercase()),
                email: format!("{}@email.com", name),
                is_admin: false,
            },
        )
        .await?;
    }
    User::apply_to_job(&pool, "u1", job_ids[0]).await?;

    Ok(Some(Fixture {
        app: app(AppState::new(pool.clone())),
        pool,
        job_ids,
        _guard: guard,
    }))
}

/// Drive one request through the router and decode the JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}
