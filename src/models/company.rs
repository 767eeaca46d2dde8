use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::database::{query_as_with, DatabaseError};
use crate::filter::CompanyFilter;
use crate::sql::{FieldTranslations, PartialUpdate, UpdatePayload};

const COMPANY_COLUMNS: &str = "handle, name, description, num_employees, logo_url";

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// A job as listed under its company
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyJob {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<CompanyJob>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl CompanyUpdate {
    pub fn into_payload(self) -> UpdatePayload {
        let mut payload = UpdatePayload::new();
        payload
            .set_opt("name", self.name)
            .set_opt("description", self.description)
            .set_opt("numEmployees", self.num_employees)
            .set_opt("logoUrl", self.logo_url);
        payload
    }

    pub fn translations() -> FieldTranslations {
        FieldTranslations::from([("numEmployees", "num_employees"), ("logoUrl", "logo_url")])
    }
}

impl Company {
    pub async fn create(pool: &PgPool, data: NewCompany) -> Result<Company, DatabaseError> {
        let sql = format!(
            "INSERT INTO companies ({cols}) VALUES ($1, $2, $3, $4, $5) RETURNING {cols}",
            cols = COMPANY_COLUMNS
        );
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(&data.handle)
            .bind(&data.name)
            .bind(&data.description)
            .bind(data.num_employees)
            .bind(&data.logo_url)
            .fetch_one(pool)
            .await
            .map_err(|e| DatabaseError::on_unique_violation(e, || format!("Duplicate company: {}", data.handle)))?;

        tracing::info!("Created company {}", company.handle);
        Ok(company)
    }

    /// Companies ordered by name. A filter that matches nothing is `NotFound`.
    pub async fn find_all(pool: &PgPool, filter: &CompanyFilter) -> Result<Vec<Company>, DatabaseError> {
        let clause = filter.to_where()?;
        let sql = format!(
            "SELECT {} FROM companies WHERE 1=1{} ORDER BY name",
            COMPANY_COLUMNS, clause.query
        );
        tracing::debug!(sql = %sql, params = clause.params.len(), "company search");

        let companies = query_as_with::<Company>(&sql, &clause.params).fetch_all(pool).await?;
        if companies.is_empty() && !filter.is_empty() {
            return Err(DatabaseError::NotFound(filter.empty_result_message()));
        }
        Ok(companies)
    }

    /// The bare company row, without its jobs.
    pub async fn find(pool: &PgPool, handle: &str) -> Result<Company, DatabaseError> {
        let sql = format!("SELECT {} FROM companies WHERE handle = $1", COMPANY_COLUMNS);
        sqlx::query_as::<_, Company>(&sql)
            .bind(handle)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No company: {}", handle)))
    }

    pub async fn get(pool: &PgPool, handle: &str) -> Result<CompanyDetail, DatabaseError> {
        let company = Company::find(pool, handle).await?;

        let jobs = sqlx::query_as::<_, CompanyJob>(
            "SELECT id, title, salary, equity FROM jobs WHERE company_handle = $1 ORDER BY id",
        )
        .bind(handle)
        .fetch_all(pool)
        .await?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Partial update; the handle itself cannot change.
    pub async fn update(pool: &PgPool, handle: &str, data: CompanyUpdate) -> Result<Company, DatabaseError> {
        let statement = PartialUpdate::statement(
            "companies",
            &data.into_payload(),
            &CompanyUpdate::translations(),
            "handle",
            handle,
            COMPANY_COLUMNS,
        )?;

        query_as_with::<Company>(&statement.query, &statement.params)
            .fetch_optional(pool)
            .await
            .map_err(|e| DatabaseError::on_unique_violation(e, || "Duplicate company name".to_string()))?
            .ok_or_else(|| DatabaseError::NotFound(format!("No company: {}", handle)))
    }

    pub async fn remove(pool: &PgPool, handle: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM companies WHERE handle = $1")
            .bind(handle)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("No company: {}", handle)));
        }
        tracing::info!("Removed company {}", handle);
        Ok(())
    }
}
