use common_errors::LoadError;
use database_traits::transaction::{SqlTransaction, settle};
use deadpool_postgres::{Object, Pool};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement, TransactionTrait};
use tracing::debug;

use crate::config::OrmOptions;

/// Direct protocol handle
#[derive(Debug, Clone)]
pub struct SqlConnect {
    pool: Pool,
}

impl SqlConnect {
    pub fn new(pool: Pool) -> Self { Self { pool } }

    pub async fn get_client(
        &self,
    ) -> Result<Object, deadpool_postgres::PoolError> {
        self.pool.get().await
    }

    /// Runs one or more statements outside of any transaction
    pub async fn batch_execute(&self, sql: &str) -> Result<(), LoadError> {
        let client = self.get_client().await.map_err(LoadError::connection)?;
        client.batch_execute(sql).await.map_err(LoadError::statement)
    }

    /// Get pool statistics for monitoring
    pub fn get_pool_status(&self) -> (usize, usize) {
        let status = self.pool.status();
        (status.available, status.size)
    }

    /// Closes the pool; idle connections are dropped immediately
    pub fn close(self) {
        self.pool.close();
        debug!("Direct protocol pool closed");
    }
}

/// Mapping layer handle
#[derive(Debug)]
pub struct OrmConnect {
    db: DatabaseConnection,
    options: OrmOptions,
}

impl OrmConnect {
    pub fn new(db: DatabaseConnection, options: OrmOptions) -> Self {
        Self { db, options }
    }

    pub fn options(&self) -> &OrmOptions { &self.options }

    pub async fn begin(&self) -> Result<SqlTransaction, LoadError> {
        let tx = self.db.begin().await.map_err(LoadError::connection)?;
        Ok(SqlTransaction::new(
            tx,
            !self.options.disable_nested_transaction,
        ))
    }

    /// Executes a single statement, wrapped in its own transaction unless
    /// default transactions are skipped.
    pub async fn execute(&self, stmt: Statement) -> Result<u64, LoadError> {
        if self.options.skip_default_transaction {
            let result =
                self.db.execute(stmt).await.map_err(LoadError::statement)?;
            return Ok(result.rows_affected());
        }

        let tx = self.begin().await?;
        let work = tx
            .execute(stmt)
            .await
            .map(|result| result.rows_affected())
            .map_err(LoadError::statement);
        settle(tx, work).await
    }

    pub async fn close(self) -> Result<(), LoadError> {
        self.db.close().await.map_err(LoadError::connection)?;
        debug!("Mapping layer connection closed");
        Ok(())
    }

    pub fn into_connect(self) -> DatabaseConnection { self.db }
}
