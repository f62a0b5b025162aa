use std::{future::Future, ops::Deref};

use common_errors::LoadError;
use sea_orm::{DatabaseTransaction, DbErr, TransactionTrait};
use tracing::{debug, warn};

use super::BoxedResultSendFuture;

pub trait TransactionOps {
    type Error: std::error::Error + Send + Sync + 'static;

    type SubmitFuture<'s>: Future<Output = Result<(), Self::Error>>
        + 's
        + Send
    where
        Self: 's;

    fn submit<'s>(self) -> Self::SubmitFuture<'s>
    where
        Self: 's;

    type RollBackFuture<'r>: Future<Output = Result<(), Self::Error>>
        + 'r
        + Send
    where
        Self: 'r;

    fn rollback<'r>(self) -> Self::RollBackFuture<'r>
    where
        Self: 'r;
}

/// Ends `tx` according to the outcome of the work done inside it.
///
/// Successful work is committed. Failed work is rolled back and the original
/// error returned, unless the rollback itself fails: then the rollback error
/// takes its place. A failed COMMIT already ends the transaction on the
/// server, so it is reported as-is.
pub async fn settle<T, R>(
    tx: T, work: Result<R, LoadError>,
) -> Result<R, LoadError>
where
    T: TransactionOps,
{
    match work {
        Ok(value) => {
            tx.submit().await.map_err(LoadError::commit)?;
            debug!("Transaction committed");
            Ok(value)
        }
        Err(err) => {
            warn!(error = %err, "Rolling back transaction");
            match tx.rollback().await {
                Ok(()) => Err(err),
                Err(rollback_err) => {
                    warn!(
                        original = %err,
                        "Rollback failed, original error discarded"
                    );
                    Err(LoadError::rollback(rollback_err))
                }
            }
        }
    }
}

/// Transaction on a pooled `tokio-postgres` client
pub struct PgTransaction<'a>(pub deadpool_postgres::Transaction<'a>);

impl<'a> TransactionOps for PgTransaction<'a> {
    type Error = tokio_postgres::Error;
    type RollBackFuture<'r>
        = BoxedResultSendFuture<'r, (), tokio_postgres::Error>
    where
        Self: 'r;
    type SubmitFuture<'s>
        = BoxedResultSendFuture<'s, (), tokio_postgres::Error>
    where
        Self: 's;

    fn submit<'s>(self) -> Self::SubmitFuture<'s>
    where
        Self: 's,
    {
        Box::pin(self.0.commit())
    }

    fn rollback<'r>(self) -> Self::RollBackFuture<'r>
    where
        Self: 'r,
    {
        Box::pin(self.0.rollback())
    }
}

impl<'a> Deref for PgTransaction<'a> {
    type Target = deadpool_postgres::Transaction<'a>;

    fn deref(&self) -> &Self::Target { &self.0 }
}

/// Transaction on the mapping layer.
///
/// Nested transactions are savepoints; they are refused when the connection
/// was opened with nesting disabled.
#[derive(Debug)]
pub struct SqlTransaction {
    inner: DatabaseTransaction,
    allow_nested: bool,
}

impl SqlTransaction {
    pub fn new(inner: DatabaseTransaction, allow_nested: bool) -> Self {
        Self {
            inner,
            allow_nested,
        }
    }

    pub fn allows_nested(&self) -> bool { self.allow_nested }

    pub async fn begin_nested(&self) -> Result<SqlTransaction, LoadError> {
        if !self.allow_nested {
            return Err(LoadError::statement(
                "nested transactions are disabled on this connection",
            ));
        }

        let inner = self.inner.begin().await.map_err(LoadError::statement)?;
        Ok(Self::new(inner, true))
    }
}

impl TransactionOps for SqlTransaction {
    type Error = DbErr;
    type RollBackFuture<'r> = BoxedResultSendFuture<'r, (), DbErr>;
    type SubmitFuture<'r> = BoxedResultSendFuture<'r, (), DbErr>;

    fn submit<'s>(self) -> Self::SubmitFuture<'s>
    where
        Self: 's,
    {
        Box::pin(self.inner.commit())
    }

    fn rollback<'r>(self) -> Self::RollBackFuture<'r>
    where
        Self: 'r,
    {
        Box::pin(self.inner.rollback())
    }
}

impl Deref for SqlTransaction {
    type Target = DatabaseTransaction;

    fn deref(&self) -> &Self::Target { &self.inner }
}
