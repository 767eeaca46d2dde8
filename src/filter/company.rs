use serde::Deserialize;

use crate::error::ApiError;
use crate::sql::{FilterWhere, SqlBuildError, SqlResult};
use crate::validation::{Checks, Validate};

/// Query-string criteria for `GET /companies`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyFilter {
    pub name: Option<String>,
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
}

impl CompanyFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.min_employees.is_none() && self.max_employees.is_none()
    }

    /// ` AND ...` fragment for `SELECT ... FROM companies WHERE 1=1`
    pub fn to_where(&self) -> Result<SqlResult, SqlBuildError> {
        if let (Some(min), Some(max)) = (self.min_employees, self.max_employees) {
            if min > max {
                return Err(SqlBuildError::InvalidRange {
                    lower_field: "minEmployees",
                    upper_field: "maxEmployees",
                });
            }
        }

        let mut filter = FilterWhere::new();
        if let Some(name) = &self.name {
            filter.contains("name", name);
        }
        if let Some(min) = self.min_employees {
            filter.at_least("num_employees", min);
        }
        if let Some(max) = self.max_employees {
            filter.at_most("num_employees", max);
        }
        Ok(filter.generate())
    }

    /// Best guess at which criterion emptied the result.
    pub fn empty_result_message(&self) -> String {
        if let Some(min) = self.min_employees {
            format!("No companies with at least {} employees", min)
        } else if let Some(name) = &self.name {
            format!("No companies matching name '{}'", name)
        } else if let Some(max) = self.max_employees {
            format!("No companies with at most {} employees", max)
        } else {
            "No companies found".to_string()
        }
    }
}

impl Validate for CompanyFilter {
    fn validate(&self) -> Result<(), ApiError> {
        Checks::new()
            .length("name", self.name.as_deref(), 1, 100)
            .non_negative("minEmployees", self.min_employees)
            .non_negative("maxEmployees", self.max_employees)
            .finish()
    }
}
