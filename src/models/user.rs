use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::config;
use crate::database::{query_as_with, DatabaseError};
use crate::sql::{FieldTranslations, PartialUpdate, UpdatePayload};

const USER_COLUMNS: &str = "username, first_name, last_name, email, is_admin";

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    /// Ids of jobs this user applied to
    pub applications: Vec<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

impl UserUpdate {
    /// Payload with `password` already hashed.
    pub fn into_payload(self, bcrypt_cost: u32) -> Result<UpdatePayload, DatabaseError> {
        let password = match self.password {
            Some(p) => Some(bcrypt::hash(p, bcrypt_cost)?),
            None => None,
        };
        let mut payload = UpdatePayload::new();
        payload
            .set_opt("firstName", self.first_name)
            .set_opt("lastName", self.last_name)
            .set_opt("password", password)
            .set_opt("email", self.email);
        Ok(payload)
    }

    pub fn translations() -> FieldTranslations {
        FieldTranslations::from([("firstName", "first_name"), ("lastName", "last_name")])
    }
}

#[derive(FromRow)]
struct Credentials {
    password: String,
    #[sqlx(flatten)]
    user: User,
}

impl User {
    /// Check a username/password pair. Unknown users and wrong passwords
    /// fail identically.
    pub async fn authenticate(pool: &PgPool, username: &str, password: &str) -> Result<User, DatabaseError> {
        let sql = format!("SELECT password, {} FROM users WHERE username = $1", USER_COLUMNS);
        let found = sqlx::query_as::<_, Credentials>(&sql)
            .bind(username)
            .fetch_optional(pool)
            .await?;

        match found {
            Some(creds) if bcrypt::verify(password, &creds.password)? => Ok(creds.user),
            _ => {
                tracing::info!("Failed login for '{}'", username);
                Err(DatabaseError::InvalidCredentials)
            }
        }
    }

    pub async fn register(pool: &PgPool, data: NewUser) -> Result<User, DatabaseError> {
        let hashed = bcrypt::hash(&data.password, config::config().security.bcrypt_cost)?;
        let sql = format!(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&data.username)
            .bind(&hashed)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.email)
            .bind(data.is_admin)
            .fetch_one(pool)
            .await
            .map_err(|e| DatabaseError::on_unique_violation(e, || format!("Duplicate username: {}", data.username)))?;

        tracing::info!("Registered user {}", user.username);
        Ok(user)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users ORDER BY username", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?)
    }

    pub async fn get(pool: &PgPool, username: &str) -> Result<UserDetail, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No user: {}", username)))?;

        let applications: Vec<i32> =
            sqlx::query_scalar("SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id")
                .bind(username)
                .fetch_all(pool)
                .await?;

        Ok(UserDetail { user, applications })
    }

    pub async fn update(pool: &PgPool, username: &str, data: UserUpdate) -> Result<User, DatabaseError> {
        let payload = data.into_payload(config::config().security.bcrypt_cost)?;
        let statement = PartialUpdate::statement(
            "users",
            &payload,
            &UserUpdate::translations(),
            "username",
            username,
            USER_COLUMNS,
        )?;

        query_as_with::<User>(&statement.query, &statement.params)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No user: {}", username)))
    }

    pub async fn remove(pool: &PgPool, username: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("No user: {}", username)));
        }
        tracing::info!("Removed user {}", username);
        Ok(())
    }

    pub async fn apply_to_job(pool: &PgPool, username: &str, job_id: i32) -> Result<(), DatabaseError> {
        let job: Option<i32> = sqlx::query_scalar("SELECT id FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(pool)
            .await?;
        if job.is_none() {
            return Err(DatabaseError::NotFound(format!("No job: {}", job_id)));
        }

        let user: Option<String> = sqlx::query_scalar("SELECT username FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await?;
        if user.is_none() {
            return Err(DatabaseError::NotFound(format!("No username: {}", username)));
        }

        sqlx::query("INSERT INTO applications (job_id, username) VALUES ($1, $2)")
            .bind(job_id)
            .bind(username)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::on_unique_violation(e, || format!("Already applied to job {}", job_id)))?;

        tracing::info!("User {} applied to job {}", username, job_id);
        Ok(())
    }
}
