use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a connection provider or an insertion strategy.
///
/// Variants are classified by the phase that failed, not by the driver that
/// reported it. `Rollback` is the most severe: the transaction state is
/// undefined and it is reported in place of whatever error triggered the
/// rollback.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Connection error: {0}")]
    Connection(#[source] BoxError),
    #[error("Statement error: {0}")]
    Statement(#[source] BoxError),
    #[error("Commit error: {0}")]
    Commit(#[source] BoxError),
    #[error("Rollback error: {0}")]
    Rollback(#[source] BoxError),
}

impl LoadError {
    pub fn connection<E: Into<BoxError>>(err: E) -> Self {
        Self::Connection(err.into())
    }

    pub fn statement<E: Into<BoxError>>(err: E) -> Self {
        Self::Statement(err.into())
    }

    pub fn commit<E: Into<BoxError>>(err: E) -> Self {
        Self::Commit(err.into())
    }

    pub fn rollback<E: Into<BoxError>>(err: E) -> Self {
        Self::Rollback(err.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::Statement(_) => "statement",
            Self::Commit(_) => "commit",
            Self::Rollback(_) => "rollback",
        }
    }
}
