//! Filtered read queries.
//!
//! A listing endpoint accepts a handful of independent, optional filters. Each
//! filter that is set contributes one predicate; [`build_filtered_query`] joins
//! them under a single `WHERE` and always finishes with the listing's fixed
//! `ORDER BY`. Placeholders come from the running parameter count, so any
//! combination of filters yields `$1..$n` without gaps.

use crate::error::{JoblyError, JoblyResult};
use crate::sql::{QueryFragment, Sql, sql};
use serde::Deserialize;

/// A set of optional filter dimensions over one listing.
pub trait FilterCriteria {
    /// One predicate per dimension that is set, in fixed evaluation order.
    fn predicates(&self) -> Vec<Sql>;

    /// Column expression the listing is sorted by (ascending).
    fn order_by(&self) -> &'static str;
}

/// Append the predicates of `criteria` and the ordering suffix to `base_query`.
pub fn build_filtered_query(base_query: &str, criteria: &impl FilterCriteria) -> QueryFragment {
    let mut q = sql(base_query);
    q.push_where_and(criteria.predicates());
    q.push(" ORDER BY ").push(criteria.order_by());
    q.build()
}

/// `%value%` pattern for a case-insensitive substring match.
fn contains_pattern(value: &str) -> String {
    format!("%{value}%")
}

/// Filters accepted by the job listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    /// Case-insensitive substring of the title. An empty string is treated as unset.
    pub title: Option<String>,
    /// Inclusive lower bound on salary. `Some(0)` is a real constraint.
    pub min_salary: Option<i32>,
    /// When `Some(true)`, only jobs with a non-zero equity. `Some(false)` lists everything.
    pub has_equity: Option<bool>,
}

impl JobFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn min_salary(mut self, min_salary: i32) -> Self {
        self.min_salary = Some(min_salary);
        self
    }

    pub fn has_equity(mut self, has_equity: bool) -> Self {
        self.has_equity = Some(has_equity);
        self
    }
}

impl FilterCriteria for JobFilter {
    fn predicates(&self) -> Vec<Sql> {
        let mut predicates = Vec::with_capacity(3);

        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            predicates.push(sql("title ILIKE ").bind(contains_pattern(title)));
        }
        if let Some(min_salary) = self.min_salary {
            predicates.push(sql("salary >= ").bind(min_salary));
        }
        // Literal comparison: nothing is bound, so later placeholders keep their numbering.
        if self.has_equity == Some(true) {
            predicates.push(sql("equity > 0"));
        }

        predicates
    }

    fn order_by(&self) -> &'static str {
        "title"
    }
}

/// Filters accepted by the company listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFilter {
    /// Case-insensitive substring of the name. An empty string is treated as unset.
    pub name: Option<String>,
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
}

impl CompanyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn min_employees(mut self, n: i32) -> Self {
        self.min_employees = Some(n);
        self
    }

    pub fn max_employees(mut self, n: i32) -> Self {
        self.max_employees = Some(n);
        self
    }

    /// Reject an employee range that cannot match anything.
    pub fn validate(&self) -> JoblyResult<()> {
        if let (Some(min), Some(max)) = (self.min_employees, self.max_employees)
            && min > max
        {
            return Err(JoblyError::malformed(format!(
                "minEmployees ({min}) cannot be greater than maxEmployees ({max})"
            )));
        }
        Ok(())
    }
}

impl FilterCriteria for CompanyFilter {
    fn predicates(&self) -> Vec<Sql> {
        let mut predicates = Vec::with_capacity(3);

        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            predicates.push(sql("name ILIKE ").bind(contains_pattern(name)));
        }
        if let Some(min) = self.min_employees {
            predicates.push(sql("num_employees >= ").bind(min));
        }
        if let Some(max) = self.max_employees {
            predicates.push(sql("num_employees <= ").bind(max));
        }

        predicates
    }

    fn order_by(&self) -> &'static str {
        "name"
    }
}
