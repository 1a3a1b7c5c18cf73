//! Scalar parameter values carried by the query builders.
//!
//! Request payloads arrive as loosely typed JSON scalars. [`SqlValue`] keeps
//! them in that shape until bind time, where it adapts to the column type
//! Postgres reports for the placeholder.

use bytes::BytesMut;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// A single bound parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Short variant name used in bind error messages.
    fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Bool(_) => "bool",
            SqlValue::Int(_) => "int",
            SqlValue::Float(_) => "float",
            SqlValue::Text(_) => "text",
        }
    }

    fn mismatch(&self, ty: &Type) -> Box<dyn Error + Sync + Send> {
        format!("cannot bind {} value to column of type {}", self.kind(), ty).into()
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Bool(b) => b.to_sql_checked(ty, out),
            SqlValue::Int(n) => match *ty {
                Type::INT2 => i16::try_from(*n)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*n)?.to_sql(ty, out),
                Type::INT8 => n.to_sql(ty, out),
                Type::FLOAT4 => (*n as f32).to_sql(ty, out),
                Type::FLOAT8 => (*n as f64).to_sql(ty, out),
                Type::NUMERIC => Decimal::from(*n).to_sql(ty, out),
                _ => Err(self.mismatch(ty)),
            },
            SqlValue::Float(f) => match *ty {
                Type::FLOAT4 => (*f as f32).to_sql(ty, out),
                Type::FLOAT8 => f.to_sql(ty, out),
                Type::NUMERIC => Decimal::try_from(*f)?.to_sql(ty, out),
                _ => Err(self.mismatch(ty)),
            },
            SqlValue::Text(s) => match *ty {
                // Decimal columns are commonly sent as strings ("0.05") to keep precision.
                Type::NUMERIC => s.trim().parse::<Decimal>()?.to_sql(ty, out),
                _ => s.as_str().to_sql_checked(ty, out),
            },
        }
    }

    // Compatibility is decided per variant in `to_sql`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(i64::from(value))
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<Decimal> for SqlValue {
    fn from(value: Decimal) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_json_scalars() {
        let values: Vec<SqlValue> =
            serde_json::from_str(r#"[null, true, 5, 2.5, "Mel"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                SqlValue::Null,
                SqlValue::Bool(true),
                SqlValue::Int(5),
                SqlValue::Float(2.5),
                SqlValue::Text("Mel".into()),
            ]
        );
    }

    #[test]
    fn int_binds_to_int4_within_range() {
        let mut buf = BytesMut::new();
        let res = SqlValue::Int(110_000).to_sql_checked(&Type::INT4, &mut buf);
        assert!(matches!(res, Ok(IsNull::No)));
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn int_out_of_int4_range_is_bind_error() {
        let mut buf = BytesMut::new();
        assert!(SqlValue::Int(i64::MAX).to_sql_checked(&Type::INT4, &mut buf).is_err());
    }

    #[test]
    fn text_parses_into_numeric() {
        let mut buf = BytesMut::new();
        assert!(SqlValue::from("0.05").to_sql_checked(&Type::NUMERIC, &mut buf).is_ok());

        let mut buf = BytesMut::new();
        assert!(SqlValue::from("lots").to_sql_checked(&Type::NUMERIC, &mut buf).is_err());
    }

    #[test]
    fn null_binds_to_any_type() {
        let mut buf = BytesMut::new();
        let res = SqlValue::Null.to_sql_checked(&Type::NUMERIC, &mut buf);
        assert!(matches!(res, Ok(IsNull::Yes)));
    }

    #[test]
    fn bool_rejects_text_column() {
        let mut buf = BytesMut::new();
        assert!(SqlValue::Bool(true).to_sql_checked(&Type::TEXT, &mut buf).is_err());
    }

    #[test]
    fn option_none_becomes_null() {
        assert!(SqlValue::from(None::<i32>).is_null());
        assert_eq!(SqlValue::from(Some(5)), SqlValue::Int(5));
    }
}
