//! Test database helper utilities
//!
//! Uses `TEST_DATABASE_URL` when set (CI), otherwise starts a throwaway
//! PostgreSQL container.

use std::sync::Once;

use anyhow::Context;
use sqlx::PgPool;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::postgres::Postgres as PostgresImage;

use event_buddy::database::run_migrations;

static INIT: Once = Once::new();

pub struct TestDatabase {
    pub pool: PgPool,
    pub database_url: String,
    _container: Option<ContainerAsync<PostgresImage>>,
}

impl TestDatabase {
    /// Migrated, empty database
    pub async fn new() -> anyhow::Result<Self> {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        });

        let (database_url, container) = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => (url, None),
            Err(_) => {
                let container = PostgresImage::default()
                    .with_db_name("test_eventbuddy")
                    .with_user("test_user")
                    .with_password("test_password")
                    .start()
                    .await
                    .context("failed to start postgres container")?;
                let host = container.get_host().await?;
                let port = container.get_host_port_ipv4(5432).await?;
                let url = format!(
                    "postgresql://test_user:test_password@{}:{}/test_eventbuddy",
                    host, port
                );
                (url, Some(container))
            }
        };

        let pool = PgPool::connect(&database_url)
            .await
            .with_context(|| format!("failed to connect to {}", database_url))?;
        run_migrations(&pool).await?;

        let db = Self {
            pool,
            database_url,
            _container: container,
        };
        db.cleanup().await?;
        Ok(db)
    }

    /// Clean all test data from the database
    pub async fn cleanup(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "TRUNCATE rsvps, friendships, casual_plans, events, venues, profiles RESTART IDENTITY CASCADE",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Count rows in a table
    pub async fn count_records(&self, table: &str) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}
