#![allow(dead_code)]

use jobly::{Company, DbConfig, Job, JoblyResult, NewCompany, NewJob};
use rust_decimal::Decimal;
use tokio_postgres::{Client, Transaction};

/// Temporary tables shadow any real ones for the rest of the transaction.
const SCHEMA: &str = "
CREATE TEMP TABLE companies (
    handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)),
    name TEXT UNIQUE NOT NULL,
    num_employees INTEGER CHECK (num_employees >= 0),
    description TEXT NOT NULL,
    logo_url TEXT
) ON COMMIT DROP;

CREATE TEMP TABLE jobs (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    salary INTEGER CHECK (salary >= 0),
    equity NUMERIC CHECK (equity <= 1.0),
    company_handle VARCHAR(25) NOT NULL
        REFERENCES companies ON DELETE CASCADE
) ON COMMIT DROP;
";

pub async fn try_connect(test: &str) -> Option<Client> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping {test}");
            return None;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    Some(
        jobly::connect(&DbConfig::new(database_url))
            .await
            .expect("Failed to connect to DATABASE_URL"),
    )
}

pub fn dec(s: &str) -> Decimal {
    s.parse().expect("valid decimal")
}

/// Create the schema and the fixture rows; returns the ids of the seeded jobs
/// in insertion order.
pub async fn seed(tx: &Transaction<'_>) -> JoblyResult<Vec<i32>> {
    tx.batch_execute(SCHEMA).await?;

    for n in 1..=3 {
        Company::create(
            tx,
            &NewCompany {
                handle: format!("c{n}"),
                name: format!("C{n}"),
                description: format!("Desc{n}"),
                num_employees: Some(n),
                logo_url: Some(format!("http://c{n}.img")),
            },
        )
        .await?;
    }

    let fixtures = [
        ("Conservator, furniture", 110_000, "0", "c1"),
        ("Information officer", 200_000, "0", "c1"),
        ("Consulting civil engineer", 60_000, "0", "c3"),
        ("Data engineer", 150_000, "0.05", "c2"),
    ];

    let mut ids = Vec::with_capacity(fixtures.len());
    for (title, salary, equity, handle) in fixtures {
        let job = Job::create(
            tx,
            &NewJob {
                title: title.to_string(),
                salary: Some(salary),
                equity: Some(dec(equity)),
                company_handle: handle.to_string(),
            },
        )
        .await?;
        ids.push(job.id);
    }
    Ok(ids)
}
