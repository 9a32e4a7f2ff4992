//! Database bootstrap: create the target database if missing and apply the `students` DDL.

use crate::error::AppError;
use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// DDL for the students table. Idempotent; `pgcrypto` provides `gen_random_uuid()` on older servers.
const STUDENTS_DDL: &[&str] = &[
    "CREATE EXTENSION IF NOT EXISTS pgcrypto",
    r#"
    CREATE TABLE IF NOT EXISTS students (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL,
        class_enrolled TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS students_created_at_idx ON students (created_at)",
];

/// Apply the students schema. Safe to run on every startup.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for ddl in STUDENTS_DDL {
        tracing::debug!(sql = %ddl.trim(), "migration");
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!("students schema ready");
    Ok(())
}

/// Create the database named in `database_url` when it is missing, by way of the
/// server's `postgres` maintenance database. URLs without a database name are left alone.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin, target) = maintenance_target(database_url)?;
    let Some(db_name) = target else {
        tracing::debug!("DATABASE_URL names no database; skipping creation check");
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if exists {
        tracing::info!(database = %db_name, "database already exists");
    } else {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Connection options for the `postgres` maintenance database, plus the database the
/// service should run against (`None` when absent or already `postgres`).
fn maintenance_target(url: &str) -> Result<(PgConnectOptions, Option<String>), AppError> {
    let opts = PgConnectOptions::from_str(url)
        .map_err(|e| AppError::Config(format!("invalid DATABASE_URL: {}", e)))?;
    let target = opts
        .get_database()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "postgres")
        .map(str::to_string);
    Ok((opts.database("postgres"), target))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
