mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{admin_token, send, u1_token};

fn titles(body: &Value) -> Vec<String> {
    body["data"]["jobs"]
        .as_array()
        .map(|rows| rows.iter().filter_map(|j| j["title"].as_str().map(String::from)).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn inverted_salary_range_is_rejected() -> Result<()> {
    let app = common::lazy_app();

    let (status, body) = send(&app, Method::GET, "/jobs?minSalary=300&maxSalary=100", None, None).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "minSalary cannot be greater than maxSalary");
    Ok(())
}

#[tokio::test]
async fn non_numeric_salary_is_rejected() -> Result<()> {
    let app = common::lazy_app();

    let (status, _) = send(&app, Method::GET, "/jobs?minSalary=lots", None, None).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn create_requires_admin() -> Result<()> {
    let app = common::lazy_app();
    let body = json!({ "title": "new", "salary": 10, "equity": "0.2", "companyHandle": "c1" });

    let (status, _) = send(&app, Method::POST, "/jobs", Some(&u1_token()), Some(body)).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn equity_above_one_is_invalid() -> Result<()> {
    let app = common::lazy_app();
    let body = json!({ "title": "new", "equity": "1.5", "companyHandle": "c1" });

    let (status, resp) = send(&app, Method::POST, "/jobs", Some(&admin_token()), Some(body)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["field_errors"].get("equity").is_some());
    Ok(())
}

#[tokio::test]
async fn patch_cannot_move_job() -> Result<()> {
    let app = common::lazy_app();

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/jobs/1",
        Some(&admin_token()),
        Some(json!({ "companyHandle": "c2" })),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_is_rejected() -> Result<()> {
    let app = common::lazy_app();

    let (status, _) = send(&app, Method::GET, "/jobs/abc", None, None).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn list_all_with_company_name() -> Result<()> {
    let Some(fx) = common::seeded().await? else { return Ok(()) };

    let (status, body) = send(&fx.app, Method::GET, "/jobs", None, None).await?;

    assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
    assert_eq!(titles(&body), ["j1", "j2", "j3", "j4"]);
    assert_eq!(body["data"]["jobs"][0]["companyName"], "C1");
    assert_eq!(body["data"]["jobs"][0]["equity"], "0.1");
    assert_eq!(body["data"]["jobs"][3]["salary"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn title_filter_matches_substring() -> Result<()> {
    let Some(fx) = common::seeded().await? else { return Ok(()) };

    let (status, body) = send(&fx.app, Method::GET, "/jobs?title=J1", None, None).await?;

    assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
    assert_eq!(titles(&body), ["j1"]);
    Ok(())
}

#[tokio::test]
async fn salary_bounds_are_inclusive() -> Result<()> {
    let Some(fx) = common::seeded().await? else { return Ok(()) };

    let (status, body) = send(&fx.app, Method::GET, "/jobs?minSalary=200&maxSalary=300", None, None).await?;

    assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
    assert_eq!(titles(&body), ["j2", "j3"]);
    Ok(())
}

#[tokio::test]
async fn has_equity_excludes_zero_and_null() -> Result<()> {
    let Some(fx) = common::seeded().await? else { return Ok(()) };

    let (status, body) = send(&fx.app, Method::GET, "/jobs?hasEquity=true", None, None).await?;
    assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
    assert_eq!(titles(&body), ["j1", "j2"]);

    let (status, body) = send(&fx.app, Method::GET, "/jobs?hasEquity=false", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body).len(), 4);
    Ok(())
}

#[tokio::test]
async fn empty_result_names_min_salary() -> Result<()> {
    let Some(fx) = common::seeded().await? else { return Ok(()) };

    let (status, body) = send(&fx.app, Method::GET, "/jobs?title=j&minSalary=1000000", None, None).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No jobs with a salary of at least 1000000");
    Ok(())
}

#[tokio::test]
async fn get_nests_company() -> Result<()> {
    let Some(fx) = common::seeded().await? else { return Ok(()) };
    let id = fx.job_ids[0];

    let (status, body) = send(&fx.app, Method::GET, &format!("/jobs/{}", id), None, None).await?;
    assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
    let job = &body["data"]["job"];
    assert_eq!(job["id"], id);
    assert_eq!(job["title"], "j1");
    assert_eq!(job["company"]["handle"], "c1");
    assert!(job.get("companyHandle").is_none());
    assert!(job["company"].get("jobs").is_none());

    let (status, body) = send(&fx.app, Method::GET, "/jobs/0", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No job: 0");
    Ok(())
}

#[tokio::test]
async fn admin_creates_job() -> Result<()> {
    let Some(fx) = common::seeded().await? else { return Ok(()) };
    let body = json!({ "title": "new", "salary": 10, "equity": "0.2", "companyHandle": "c2" });

    let (status, resp) = send(&fx.app, Method::POST, "/jobs", Some(&admin_token()), Some(body)).await?;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", resp);
    assert_eq!(resp["data"]["job"]["companyHandle"], "c2");
    assert_eq!(resp["data"]["job"]["equity"], "0.2");

    let orphan = json!({ "title": "orphan", "companyHandle": "nope" });
    let (status, resp) = send(&fx.app, Method::POST, "/jobs", Some(&admin_token()), Some(orphan)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(resp["message"], "No company: nope");
    Ok(())
}

#[tokio::test]
async fn admin_patches_job() -> Result<()> {
    let Some(fx) = common::seeded().await? else { return Ok(()) };
    let id = fx.job_ids[3];

    let (status, body) = send(
        &fx.app,
        Method::PATCH,
        &format!("/jobs/{}", id),
        Some(&admin_token()),
        Some(json!({ "title": "j4-new", "salary": 400 })),
    )
    .await?;

    assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
    let job = &body["data"]["job"];
    assert_eq!(job["title"], "j4-new");
    assert_eq!(job["salary"], 400);
    assert_eq!(job["equity"], Value::Null);
    assert_eq!(job["companyHandle"], "c1");
    Ok(())
}

#[tokio::test]
async fn admin_deletes_job() -> Result<()> {
    let Some(fx) = common::seeded().await? else { return Ok(()) };
    let uri = format!("/jobs/{}", fx.job_ids[0]);

    let (status, body) = send(&fx.app, Method::DELETE, &uri, Some(&admin_token()), None).await?;
    assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
    assert_eq!(body["data"]["deleted"], fx.job_ids[0]);

    let (status, _) = send(&fx.app, Method::DELETE, &uri, Some(&admin_token()), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
