use super::job::JOB_COLUMNS;
use super::{Job, reject_immutable, update_statement};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::filter::{CompanyFilter, build_filtered_query};
use crate::partial_update::{FieldNameMap, UpdatePayload, sql_for_partial_update};
use crate::row::{FromRow, RowExt};
use crate::sql::sql;
use crate::value::SqlValue;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const COMPANY_COLUMNS: &str = "handle, name, description, num_employees, logo_url";

const COMPANY_FIELD_NAMES: FieldNameMap<'static> =
    FieldNameMap::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]);

const COMPANY_IMMUTABLE_COLUMNS: &[&str] = &["handle"];

/// A row of the `companies` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

/// A company together with the jobs it posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<Job>,
}

/// Data for a new company.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl Company {
    /// Insert a company. A handle that is already taken is a malformed request.
    pub async fn create(conn: &impl GenericClient, data: &NewCompany) -> JoblyResult<Company> {
        let existing = sql("SELECT handle FROM companies WHERE handle = ")
            .bind(data.handle.as_str())
            .tagged("companies.create.dup_check")
            .build()
            .fetch_opt(conn)
            .await?;
        if existing.is_some() {
            return Err(JoblyError::malformed(format!(
                "Duplicate company: {}",
                data.handle
            )));
        }

        let mut q = sql(format!("INSERT INTO companies ({COMPANY_COLUMNS}) VALUES ("))
            .tagged("companies.create");
        q.push_bind_list([
            SqlValue::from(data.handle.as_str()),
            SqlValue::from(data.name.as_str()),
            SqlValue::from(data.description.as_str()),
            SqlValue::from(data.num_employees),
            SqlValue::from(data.logo_url.clone()),
        ])
        .push(") RETURNING ")
        .push(COMPANY_COLUMNS);

        q.build().fetch_one_as(conn).await
    }

    /// All companies matching `filter`, ordered by name.
    ///
    /// An inverted employee range is rejected before anything runs.
    pub async fn find_all(
        conn: &impl GenericClient,
        filter: &CompanyFilter,
    ) -> JoblyResult<Vec<Company>> {
        filter.validate()?;
        build_filtered_query(&format!("SELECT {COMPANY_COLUMNS} FROM companies"), filter)
            .tagged("companies.find_all")
            .fetch_all_as(conn)
            .await
    }

    /// A company by handle, with its jobs ordered by id.
    pub async fn get(conn: &impl GenericClient, handle: &str) -> JoblyResult<CompanyDetail> {
        let select = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE handle = ");
        let company: Company = sql(select)
            .bind(handle)
            .tagged("companies.get")
            .build()
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;

        let mut jobs = sql(format!("SELECT {JOB_COLUMNS} FROM jobs WHERE company_handle = "))
            .tagged("companies.get.jobs");
        jobs.push_bind(handle).push(" ORDER BY id");
        let jobs = jobs.build().fetch_all_as(conn).await?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Change only the fields present in `data`: any of `name`, `description`,
    /// `numEmployees`, `logoUrl`. The handle is fixed.
    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        data: &UpdatePayload,
    ) -> JoblyResult<Company> {
        reject_immutable(data, &COMPANY_FIELD_NAMES, COMPANY_IMMUTABLE_COLUMNS)?;
        let update = sql_for_partial_update(data, &COMPANY_FIELD_NAMES)?;

        update_statement("companies", "handle", update, handle, COMPANY_COLUMNS)
            .tagged("companies.update")
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))
    }

    /// Delete a company by handle. Its jobs go with it (`ON DELETE CASCADE`).
    pub async fn remove(conn: &impl GenericClient, handle: &str) -> JoblyResult<()> {
        let deleted = sql("DELETE FROM companies WHERE handle = ")
            .bind(handle)
            .tagged("companies.remove")
            .build()
            .execute(conn)
            .await?;

        if deleted == 0 {
            return Err(JoblyError::not_found(format!("No company: {handle}")));
        }
        Ok(())
    }
}
