//! # Database Migrations
//!
//! Schema migrations embedded from `migrations/` at compile time and applied
//! with sqlx's migrator, which records applied versions in
//! `_sqlx_migrations` and takes an advisory lock so concurrent starters don't
//! race each other.
//!
//! Migration files follow `YYYYMMDDHHMMSS_description.sql`.

use sqlx::migrate::Migrator;
use sqlx::PgPool;
use std::time::Instant;

use crate::error::Result;
use crate::logging::{log_database_operation, log_error};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub struct DatabaseMigrations;

impl DatabaseMigrations {
    /// Apply every outstanding migration
    pub async fn run_all(pool: &PgPool) -> Result<()> {
        let started = Instant::now();

        if let Err(e) = MIGRATOR.run(pool).await {
            log_error("database", "migrate", &e.to_string(), None);
            return Err(e.into());
        }

        log_database_operation(
            "migrate",
            None,
            Some(MIGRATOR.iter().count()),
            "success",
            Some(started.elapsed().as_millis() as u64),
        );
        Ok(())
    }

    /// Versions of the migrations embedded in this build
    pub fn embedded_versions() -> Vec<i64> {
        MIGRATOR.iter().map(|migration| migration.version).collect()
    }
}
