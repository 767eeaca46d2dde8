use serde::Deserialize;

use crate::error::ApiError;
use crate::sql::{FilterWhere, SqlBuildError, SqlResult};
use crate::validation::{Checks, Validate};

/// Query-string criteria for `GET /jobs`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilter {
    pub title: Option<String>,
    pub min_salary: Option<i32>,
    pub max_salary: Option<i32>,
    pub has_equity: Option<bool>,
}

impl JobFilter {
    /// `hasEquity=false` narrows nothing, so it counts as absent.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.min_salary.is_none()
            && self.max_salary.is_none()
            && self.has_equity != Some(true)
    }

    /// ` AND ...` fragment for `SELECT ... FROM jobs WHERE 1=1`
    pub fn to_where(&self) -> Result<SqlResult, SqlBuildError> {
        if let (Some(min), Some(max)) = (self.min_salary, self.max_salary) {
            if min > max {
                return Err(SqlBuildError::InvalidRange {
                    lower_field: "minSalary",
                    upper_field: "maxSalary",
                });
            }
        }

        let mut filter = FilterWhere::new();
        if let Some(title) = &self.title {
            filter.contains("title", title);
        }
        if let Some(min) = self.min_salary {
            filter.at_least("salary", min);
        }
        if let Some(max) = self.max_salary {
            filter.at_most("salary", max);
        }
        filter.positive_if("equity", self.has_equity == Some(true));
        Ok(filter.generate())
    }

    /// Best guess at which criterion emptied the result.
    pub fn empty_result_message(&self) -> String {
        if let Some(min) = self.min_salary {
            format!("No jobs with a salary of at least {}", min)
        } else if let Some(title) = &self.title {
            format!("No jobs matching title '{}'", title)
        } else if let Some(max) = self.max_salary {
            format!("No jobs with a salary of at most {}", max)
        } else if self.has_equity == Some(true) {
            "No jobs offering equity".to_string()
        } else {
            "No jobs found".to_string()
        }
    }
}

impl Validate for JobFilter {
    fn validate(&self) -> Result<(), ApiError> {
        Checks::new()
            .length("title", self.title.as_deref(), 1, 100)
            .non_negative("minSalary", self.min_salary)
            .non_negative("maxSalary", self.max_salary)
            .finish()
    }
}
