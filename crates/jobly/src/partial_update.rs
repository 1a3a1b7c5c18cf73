//! Partial UPDATE construction.
//!
//! A PATCH-style request carries only the fields the caller wants to change.
//! [`sql_for_partial_update`] turns that payload into the assignment list of an
//! `UPDATE ... SET` statement plus the ordered values for its placeholders:
//!
//! ```ignore
//! let payload: UpdatePayload = serde_json::from_str(r#"{"firstName": "Mel", "age": 5}"#)?;
//! let update = sql_for_partial_update(&payload, &FieldNameMap::new(&[("firstName", "first_name")]))?;
//!
//! assert_eq!(update.set_cols, r#""first_name"=$1, "age"=$2"#);
//! let sql = format!("UPDATE users SET {} WHERE id = ${}", update.set_cols, update.next_placeholder());
//! ```

use crate::error::{JoblyError, JoblyResult};
use crate::sql::Sql;
use crate::value::SqlValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Logical (application) field name to physical (column) name translation.
///
/// Fields without an entry keep their logical name. Column names are written
/// as quoted identifiers, so an unknown name reaches the store as a column
/// that does not exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldNameMap<'a> {
    entries: &'a [(&'a str, &'a str)],
}

impl<'a> FieldNameMap<'a> {
    pub const fn new(entries: &'a [(&'a str, &'a str)]) -> Self {
        Self { entries }
    }

    pub const fn empty() -> Self {
        Self { entries: &[] }
    }

    /// Mapped column for `logical`, if the map has one.
    pub fn get(&self, logical: &str) -> Option<&'a str> {
        self.entries
            .iter()
            .find(|(from, _)| *from == logical)
            .map(|(_, to)| *to)
    }

    /// Physical column for `logical`, falling back to the logical name.
    pub fn column<'k>(&self, logical: &'k str) -> &'k str
    where
        'a: 'k,
    {
        self.get(logical).unwrap_or(logical)
    }
}

/// Fields to change, in the order the caller supplied them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdatePayload(IndexMap<String, SqlValue>);

impl UpdatePayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, keeping its original position if it was already present.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<SqlValue>) -> &mut Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Consuming version of [`UpdatePayload::insert`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&SqlValue> {
        self.0.get(field)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<SqlValue>> FromIterator<(K, V)> for UpdatePayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The `SET` assignment list and the values bound to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    /// `"col_a"=$1, "col_b"=$2, ...`
    pub set_cols: String,
    /// `values[i]` is bound to `$(i + 1)`.
    pub values: Vec<SqlValue>,
}

impl PartialUpdate {
    /// Placeholder index for the first parameter appended after the SET list
    /// (typically the row key in the `WHERE` clause).
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

/// Build the assignment list for an `UPDATE` touching only the fields in `payload`.
///
/// Placeholders are numbered from `$1` in payload order and `values` follows
/// the same order. An empty payload is rejected with
/// [`JoblyError::MalformedRequest`] rather than producing a no-op statement.
pub fn sql_for_partial_update(
    payload: &UpdatePayload,
    field_names: &FieldNameMap<'_>,
) -> JoblyResult<PartialUpdate> {
    if payload.is_empty() {
        return Err(JoblyError::malformed("No data"));
    }

    let mut set = Sql::empty();
    for (i, (field, value)) in payload.iter().enumerate() {
        if i > 0 {
            set.push(", ");
        }
        set.push("\"")
            .push(&field_names.column(field).replace('"', "\"\""))
            .push("\"=")
            .push_bind(value.clone());
    }

    let fragment = set.tagged("partial_update").build();
    Ok(PartialUpdate {
        set_cols: fragment.sql,
        values: fragment.params,
    })
}
