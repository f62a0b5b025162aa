pub mod test_helpers;

use std::time::Duration;

use anyhow::{Context, Result};
use deadpool_postgres::{
    Manager, ManagerConfig, Pool as PostgresPool, RecyclingMethod,
};
use sql_connection::PostgresDbConfig;
pub use test_helpers::*;
use testcontainers_modules::{
    postgres::Postgres,
    testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner},
};
use tokio_postgres::NoTls;
use tracing::debug;

/// Layout the benchmark loads into; no key, duplicates are accepted
pub const NAMES_TABLE_DDL: &str =
    "CREATE TABLE names (id integer, name varchar)";

/// Same table with a unique id, used to force a failure mid load
pub const UNIQUE_NAMES_TABLE_DDL: &str =
    "CREATE TABLE names (id integer PRIMARY KEY, name varchar)";

/// PostgreSQL test container using testcontainers-rs
pub struct TestPostgresContainer {
    pub pool: PostgresPool,
    /// Key-value descriptor pointing at the container
    pub dsn: String,
    // Keep the container alive for the lifetime of this struct
    _container: ContainerAsync<Postgres>,
}

impl TestPostgresContainer {
    /// Starts a fresh PostgreSQL container with an empty `names` table
    pub async fn new() -> Result<Self> {
        Self::with_schema(NAMES_TABLE_DDL).await
    }

    /// Starts a container whose `names` table rejects duplicate ids
    pub async fn with_unique_ids() -> Result<Self> {
        Self::with_schema(UNIQUE_NAMES_TABLE_DDL).await
    }

    async fn with_schema(ddl: &str) -> Result<Self> {
        let container = Postgres::default()
            .with_env_var("POSTGRES_DB", "bench")
            .with_env_var("POSTGRES_USER", "bench")
            .with_env_var("POSTGRES_PASSWORD", "bench")
            .start()
            .await
            .context("Failed to start PostgreSQL container")?;

        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(5432).await?;
        let dsn = format!(
            "host={host} port={port} dbname=bench user=bench password=bench \
             sslmode=disable"
        );

        let pool = Self::create_pool(&dsn).await?;

        let instance = Self {
            pool,
            dsn,
            _container: container,
        };
        instance.execute_sql(ddl).await?;

        Ok(instance)
    }

    async fn create_pool(dsn: &str) -> Result<PostgresPool> {
        let pg_config = dsn.parse::<tokio_postgres::Config>()?;

        let mgr_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };
        let mgr = Manager::from_config(pg_config, NoTls, mgr_config);

        let pool = PostgresPool::builder(mgr)
            .max_size(2)
            .build()
            .context("Failed to build PostgreSQL connection pool")?;

        // Wait until the server accepts queries
        let mut attempts = 0;
        loop {
            let ready = match pool.get().await {
                Ok(client) => client.query_one("SELECT 1", &[]).await.is_ok(),
                Err(_) => false,
            };
            if ready {
                break;
            }
            if attempts >= 20 {
                anyhow::bail!("PostgreSQL not ready after {attempts} attempts");
            }
            attempts += 1;
            debug!("Waiting for PostgreSQL, attempt {attempts}");
            tokio::time::sleep(Duration::from_millis(500)).await;
        }

        Ok(pool)
    }

    pub async fn execute_sql(&self, sql: &str) -> Result<()> {
        let client = self.pool.get().await?;
        client
            .batch_execute(sql)
            .await
            .context("Failed to execute SQL")?;
        Ok(())
    }

    /// Connection settings for the providers under test
    pub fn db_config(&self) -> PostgresDbConfig {
        PostgresDbConfig::builder().uri(self.dsn.clone()).build()
    }
}
