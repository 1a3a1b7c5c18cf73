use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::row::FromRow;
use crate::value::SqlValue;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A rendered SQL string paired with the values bound to its placeholders.
///
/// `params[i]` is bound to placeholder `$(i + 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFragment {
    pub sql: String,
    pub params: Vec<SqlValue>,
    pub(crate) tag: Option<String>,
}

impl QueryFragment {
    /// Wrap a pre-numbered SQL string and its values.
    pub fn new(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
            tag: None,
        }
    }

    /// Associate a tag that is attached to the `jobly.sql` log events.
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Index the next placeholder appended after this fragment must use.
    pub fn next_placeholder(&self) -> usize {
        self.params.len() + 1
    }

    /// Placeholder indices in order of appearance (`$3 ... $1` yields `[3, 1]`).
    ///
    /// `$` inside quoted identifiers or string literals is not a placeholder.
    pub fn placeholder_indices(&self) -> Vec<usize> {
        let bytes = self.sql.as_bytes();
        let mut out = Vec::new();
        let mut quote: Option<u8> = None;
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            match quote {
                Some(q) if b == q => quote = None,
                Some(_) => {}
                None if b == b'"' || b == b'\'' => quote = Some(b),
                None if b == b'$' => {
                    let start = i + 1;
                    let mut end = start;
                    while end < bytes.len() && bytes[end].is_ascii_digit() {
                        end += 1;
                    }
                    if end > start
                        && let Ok(n) = self.sql[start..end].parse()
                    {
                        out.push(n);
                    }
                    i = end;
                    continue;
                }
                None => {}
            }
            i += 1;
        }
        out
    }

    /// Number of distinct placeholders referenced by the SQL.
    pub fn placeholder_count(&self) -> usize {
        let mut indices = self.placeholder_indices();
        indices.sort_unstable();
        indices.dedup();
        indices.len()
    }

    /// Check that placeholders are exactly `$1..=$n` for `n` bound values.
    pub fn validate(&self) -> JoblyResult<()> {
        let mut indices = self.placeholder_indices();
        indices.sort_unstable();
        indices.dedup();

        let sequential = indices.iter().copied().eq(1..=indices.len());
        if !sequential || indices.len() != self.params.len() {
            return Err(JoblyError::malformed(format!(
                "placeholders({}) != params({})",
                indices.len(),
                self.params.len()
            )));
        }
        Ok(())
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect()
    }

    fn log(&self) {
        tracing::debug!(
            target: "jobly.sql",
            tag = self.tag.as_deref().unwrap_or("-"),
            param_count = self.params.len(),
            sql = %self.sql,
            "executing query"
        );
    }

    /// Execute and return all rows.
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> JoblyResult<Vec<Row>> {
        self.validate()?;
        self.log();
        conn.query(&self.sql, &self.params_ref()).await
    }

    /// Execute and return all rows mapped to `T`.
    pub async fn fetch_all_as<T: FromRow>(&self, conn: &impl GenericClient) -> JoblyResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute and return the first row mapped to `T`.
    ///
    /// Returns [`JoblyError::NotFound`] if no rows are returned.
    pub async fn fetch_one_as<T: FromRow>(&self, conn: &impl GenericClient) -> JoblyResult<T> {
        self.fetch_opt_as(conn)
            .await?
            .ok_or_else(|| JoblyError::not_found("Expected one row, got none"))
    }

    /// Execute and return the first row, if any.
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> JoblyResult<Option<Row>> {
        self.validate()?;
        self.log();
        conn.query_opt(&self.sql, &self.params_ref()).await
    }

    /// Execute and return at most one row mapped to `T`.
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> JoblyResult<Option<T>> {
        let row = self.fetch_opt(conn).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute and return the affected row count.
    pub async fn execute(&self, conn: &impl GenericClient) -> JoblyResult<u64> {
        self.validate()?;
        self.log();
        conn.execute(&self.sql, &self.params_ref()).await
    }
}
