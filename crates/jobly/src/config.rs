//! Database configuration and connection setup.

use crate::error::{JoblyError, JoblyResult};
use tokio_postgres::{Client, NoTls};

/// Where to find the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub database_url: String,
}

impl DbConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// Load from the environment.
    ///
    /// A `.env` file in the working directory is read first if present.
    /// `DATABASE_URL` wins; otherwise `jobly` on localhost is used, or
    /// `jobly_test` when `JOBLY_ENV=test`.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_vars(
            std::env::var("DATABASE_URL").ok(),
            std::env::var("JOBLY_ENV").ok(),
        )
    }

    fn from_vars(database_url: Option<String>, env: Option<String>) -> Self {
        let database_url = database_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| match env.as_deref() {
                Some("test") => "postgresql://localhost/jobly_test".to_string(),
                _ => "postgresql://localhost/jobly".to_string(),
            });
        Self { database_url }
    }

    /// Parse the URL into a driver config.
    pub fn pg_config(&self) -> JoblyResult<tokio_postgres::Config> {
        self.database_url
            .parse()
            .map_err(|e: tokio_postgres::Error| JoblyError::Config(e.to_string()))
    }
}

/// Open a single connection and drive it on a background task.
pub async fn connect(config: &DbConfig) -> JoblyResult<Client> {
    let pg_config = config.pg_config()?;
    let (client, connection) = pg_config
        .connect(NoTls)
        .await
        .map_err(|e| JoblyError::Connection(e.to_string()))?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!(target: "jobly.db", error = %e, "connection error");
        }
    });

    tracing::debug!(target: "jobly.db", "connected");
    Ok(client)
}
