use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::database::{query_as_with, DatabaseError};
use crate::filter::JobFilter;
use crate::models::company::Company;
use crate::sql::{FieldTranslations, PartialUpdate, UpdatePayload};

const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Row shape for `GET /jobs`
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDetail {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company: Company,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// `id` and `companyHandle` are fixed once a job exists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

impl JobUpdate {
    pub fn into_payload(self) -> UpdatePayload {
        let mut payload = UpdatePayload::new();
        payload
            .set_opt("title", self.title)
            .set_opt("salary", self.salary)
            .set_opt("equity", self.equity);
        payload
    }

    pub fn translations() -> FieldTranslations {
        FieldTranslations::new()
    }
}

impl Job {
    pub async fn create(pool: &PgPool, data: NewJob) -> Result<Job, DatabaseError> {
        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) VALUES ($1, $2, $3, $4) RETURNING {}",
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(&data.title)
            .bind(data.salary)
            .bind(data.equity)
            .bind(&data.company_handle)
            .fetch_one(pool)
            .await
            .map_err(|e| DatabaseError::on_missing_reference(e, || format!("No company: {}", data.company_handle)))?;

        tracing::info!("Created job {} for {}", job.id, job.company_handle);
        Ok(job)
    }

    /// Jobs with their company name, ordered by title. A filter that matches
    /// nothing is `NotFound`.
    pub async fn find_all(pool: &PgPool, filter: &JobFilter) -> Result<Vec<JobListing>, DatabaseError> {
        let clause = filter.to_where()?;
        let sql = format!(
            "SELECT j.id, j.title, j.salary, j.equity, j.company_handle, c.name AS company_name \
             FROM jobs j LEFT JOIN companies c ON c.handle = j.company_handle \
             WHERE 1=1{} ORDER BY j.title, j.id",
            clause.query
        );
        tracing::debug!(sql = %sql, params = clause.params.len(), "job search");

        let jobs = query_as_with::<JobListing>(&sql, &clause.params).fetch_all(pool).await?;
        if jobs.is_empty() && !filter.is_empty() {
            return Err(DatabaseError::NotFound(filter.empty_result_message()));
        }
        Ok(jobs)
    }

    pub async fn get(pool: &PgPool, id: i32) -> Result<JobDetail, DatabaseError> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No job: {}", id)))?;

        let company = Company::find(pool, &job.company_handle).await?;

        Ok(JobDetail {
            id: job.id,
            title: job.title,
            salary: job.salary,
            equity: job.equity,
            company,
        })
    }

    pub async fn update(pool: &PgPool, id: i32, data: JobUpdate) -> Result<Job, DatabaseError> {
        let statement = PartialUpdate::statement(
            "jobs",
            &data.into_payload(),
            &JobUpdate::translations(),
            "id",
            id,
            JOB_COLUMNS,
        )?;

        query_as_with::<Job>(&statement.query, &statement.params)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No job: {}", id)))
    }

    pub async fn remove(pool: &PgPool, id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("No job: {}", id)));
        }
        tracing::info!("Removed job {}", id);
        Ok(())
    }
}
