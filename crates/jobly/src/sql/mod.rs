//! Placeholder-numbering SQL builder.
//!
//! Both query builders in this crate produce a [`QueryFragment`]: a SQL string
//! using `$1, $2, ...` placeholders plus the ordered values bound to them.
//! [`Sql`] assembles such fragments without manual index bookkeeping:
//!
//! ```ignore
//! use jobly::sql;
//!
//! let mut q = sql("SELECT title FROM jobs");
//! q.push_where_and(vec![
//!     sql("salary >= ").bind(100_000),
//! ]);
//! q.push(" ORDER BY title");
//!
//! let fragment = q.build();
//! assert_eq!(fragment.sql, "SELECT title FROM jobs WHERE salary >= $1 ORDER BY title");
//! ```

mod builder;
mod fragment;


pub use builder::Sql;
pub use fragment::QueryFragment;

/// Start building a SQL statement.
pub fn sql(initial_sql: impl Into<String>) -> Sql {
    Sql::new(initial_sql)
}

#[derive(Debug, Clone)]
enum SqlPart {
    Raw(String),
    Param,
}
