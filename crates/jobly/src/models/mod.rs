//! Record management for jobs and companies.
//!
//! Every function takes `&impl GenericClient`, so callers can run them on a
//! plain connection or inside a transaction.

mod company;
mod job;

pub use company::{Company, CompanyDetail, NewCompany};
pub use job::{Job, JobListing, NewJob};

use crate::error::{JoblyError, JoblyResult};
use crate::partial_update::{FieldNameMap, PartialUpdate, UpdatePayload};
use crate::sql::QueryFragment;
use crate::value::SqlValue;

/// Fail if the payload would write a column that is fixed after creation.
///
/// Keys are resolved through `field_names` first, so a payload can't reach an
/// immutable column by spelling it as the physical name.
fn reject_immutable(
    payload: &UpdatePayload,
    field_names: &FieldNameMap<'_>,
    columns: &[&str],
) -> JoblyResult<()> {
    match payload
        .keys()
        .find(|key| columns.contains(&field_names.column(key)))
    {
        Some(field) => Err(JoblyError::malformed(format!("{field} cannot be changed"))),
        None => Ok(()),
    }
}

/// `UPDATE {table} SET ... WHERE {key_col} = $n RETURNING {returning}`, with the
/// key bound after the SET values.
fn update_statement(
    table: &str,
    key_col: &str,
    update: PartialUpdate,
    key: impl Into<SqlValue>,
    returning: &str,
) -> QueryFragment {
    let key_idx = update.next_placeholder();
    let mut params = update.values;
    params.push(key.into());

    QueryFragment::new(
        format!(
            "UPDATE {table} SET {} WHERE {key_col} = ${key_idx} RETURNING {returning}",
            update.set_cols
        ),
        params,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partial_update::sql_for_partial_update;

    const JOBS: FieldNameMap<'static> = FieldNameMap::new(&[("companyHandle", "company_handle")]);

    #[test]
    fn immutable_field_is_rejected() {
        let payload = UpdatePayload::new().with("title", "x").with("companyHandle", "c2");
        let err = reject_immutable(&payload, &JOBS, &["id", "company_handle"]).unwrap_err();
        assert!(err.is_malformed_request());
        assert_eq!(err.to_string(), "Bad request: companyHandle cannot be changed");
    }

    #[test]
    fn immutable_column_by_physical_name_is_rejected() {
        let payload = UpdatePayload::new().with("company_handle", "c2");
        let err = reject_immutable(&payload, &JOBS, &["id", "company_handle"]).unwrap_err();
        assert!(err.is_malformed_request());
        assert_eq!(err.to_string(), "Bad request: company_handle cannot be changed");

        let payload = UpdatePayload::new().with("id", 7);
        assert!(reject_immutable(&payload, &JOBS, &["id", "company_handle"]).is_err());
    }

    #[test]
    fn mutable_fields_pass() {
        let payload = UpdatePayload::new().with("title", "x").with("salary", 1);
        assert!(reject_immutable(&payload, &JOBS, &["id", "company_handle"]).is_ok());
    }

    #[test]
    fn update_statement_binds_key_after_set_values() {
        let payload = UpdatePayload::new().with("title", "New").with("salary", 90_000);
        let update = sql_for_partial_update(&payload, &FieldNameMap::empty()).unwrap();

        let q = update_statement("jobs", "id", update, 42, "id, title");

        assert_eq!(
            q.sql,
            "UPDATE jobs SET \"title\"=$1, \"salary\"=$2 WHERE id = $3 RETURNING id, title"
        );
        assert_eq!(
            q.params,
            vec![SqlValue::from("New"), SqlValue::Int(90_000), SqlValue::Int(42)]
        );
        q.validate().unwrap();
    }

    #[test]
    fn update_statement_is_valid_for_any_field_count() {
        let fields = [
            "name", "description", "num_employees", "logo_url", "a", "b", "c", "d", "e", "f",
        ];
        for n in 1..=fields.len() {
            let payload: UpdatePayload = fields[..n].iter().map(|f| (*f, *f)).collect();
            let update = sql_for_partial_update(&payload, &FieldNameMap::empty()).unwrap();

            let q = update_statement("companies", "handle", update, "c1", "handle");

            assert!(q.sql.ends_with(&format!("WHERE handle = ${} RETURNING handle", n + 1)));
            assert_eq!(q.params.len(), n + 1);
            assert_eq!(q.params[n], SqlValue::from("c1"));
            q.validate().unwrap();
        }
    }
}
