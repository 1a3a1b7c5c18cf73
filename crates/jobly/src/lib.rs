//! # jobly
//!
//! Persistence layer for a job board: companies and the jobs they post, stored
//! in PostgreSQL.
//!
//! Most of the crate is plain CRUD. The two pieces that reason about
//! variable-shape input are:
//!
//! - [`sql_for_partial_update`]: turns an arbitrary subset of fields into the
//!   `SET` list of an `UPDATE`, with placeholders numbered in payload order.
//! - [`build_filtered_query`]: appends one predicate per filter that is set
//!   and keeps `$n` placeholders sequential for any combination.
//!
//! ```ignore
//! use jobly::{Job, JobFilter, UpdatePayload};
//!
//! let client = jobly::connect(&jobly::DbConfig::from_env()).await?;
//!
//! let jobs = Job::find_all(&client, &JobFilter::new().title("eng").min_salary(90_000)).await?;
//!
//! let patch: UpdatePayload = serde_json::from_str(r#"{"salary": 120000}"#)?;
//! let job = Job::update(&client, jobs[0].id, &patch).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod partial_update;
pub mod row;
pub mod sql;
pub mod value;

pub use client::GenericClient;
pub use config::{DbConfig, connect};
pub use error::{JoblyError, JoblyResult};
pub use filter::{CompanyFilter, FilterCriteria, JobFilter, build_filtered_query};
pub use models::{Company, CompanyDetail, Job, JobListing, NewCompany, NewJob};
pub use partial_update::{FieldNameMap, PartialUpdate, UpdatePayload, sql_for_partial_update};
pub use row::{FromRow, RowExt};
pub use sql::{QueryFragment, Sql, sql};
pub use value::SqlValue;
