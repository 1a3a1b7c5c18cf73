use super::{reject_immutable, update_statement};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::filter::{JobFilter, build_filtered_query};
use crate::partial_update::{FieldNameMap, UpdatePayload, sql_for_partial_update};
use crate::row::{FromRow, RowExt};
use crate::sql::sql;
use crate::value::SqlValue;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

pub(super) const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

/// Logical-to-column names for job updates. The company a job belongs to is fixed.
const JOB_FIELD_NAMES: FieldNameMap<'static> =
    FieldNameMap::new(&[("companyHandle", "company_handle")]);

const JOB_IMMUTABLE_COLUMNS: &[&str] = &["id", "company_handle"];

const JOB_LISTING_QUERY: &str = "SELECT j.id, \
            j.title, \
            j.salary, \
            j.equity, \
            j.company_handle, \
            c.name AS company_name \
     FROM jobs j \
     LEFT JOIN companies AS c ON c.handle = j.company_handle";

/// A row of the `jobs` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

/// A job as shown in listings, with the owning company's name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
    pub company_name: Option<String>,
}

impl FromRow for JobListing {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
            company_name: row.try_get_column("company_name")?,
        })
    }
}

/// Data for a new job posting.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl Job {
    /// Insert a job and return it with its generated id.
    pub async fn create(conn: &impl GenericClient, data: &NewJob) -> JoblyResult<Job> {
        let mut q = sql("INSERT INTO jobs (title, salary, equity, company_handle) VALUES (")
            .tagged("jobs.create");
        q.push_bind_list([
            SqlValue::from(data.title.as_str()),
            SqlValue::from(data.salary),
            SqlValue::from(data.equity),
            SqlValue::from(data.company_handle.as_str()),
        ])
        .push(") RETURNING ")
        .push(JOB_COLUMNS);

        q.build().fetch_one_as(conn).await
    }

    /// All jobs matching `filter`, ordered by title.
    pub async fn find_all(
        conn: &impl GenericClient,
        filter: &JobFilter,
    ) -> JoblyResult<Vec<JobListing>> {
        build_filtered_query(JOB_LISTING_QUERY, filter)
            .tagged("jobs.find_all")
            .fetch_all_as(conn)
            .await
    }

    /// A single job by id.
    pub async fn get(conn: &impl GenericClient, id: i32) -> JoblyResult<Job> {
        sql(format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = "))
            .bind(id)
            .tagged("jobs.get")
            .build()
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job: {id}")))
    }

    /// Change only the fields present in `data`: any of `title`, `salary`, `equity`.
    ///
    /// `id` and the owning company are rejected as malformed, under either
    /// their field or column names.
    pub async fn update(
        conn: &impl GenericClient,
        id: i32,
        data: &UpdatePayload,
    ) -> JoblyResult<Job> {
        reject_immutable(data, &JOB_FIELD_NAMES, JOB_IMMUTABLE_COLUMNS)?;
        let update = sql_for_partial_update(data, &JOB_FIELD_NAMES)?;

        update_statement("jobs", "id", update, id, JOB_COLUMNS)
            .tagged("jobs.update")
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job: {id}")))
    }

    /// Delete a job by id.
    pub async fn remove(conn: &impl GenericClient, id: i32) -> JoblyResult<()> {
        let deleted = sql("DELETE FROM jobs WHERE id = ")
            .bind(id)
            .tagged("jobs.remove")
            .build()
            .execute(conn)
            .await?;

        if deleted == 0 {
            return Err(JoblyError::not_found(format!("No job: {id}")));
        }
        Ok(())
    }
}
