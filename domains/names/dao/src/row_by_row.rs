use common_errors::LoadError;
use database_traits::transaction::{SqlTransaction, settle};
use names_models::Record;
use sea_orm::{ConnectionTrait, DbBackend, Statement};
use sql_connection::OrmConnect;
use tracing::{debug, info, instrument};

pub const INSERT_STATEMENT: &str =
    "INSERT INTO names (id, name) VALUES ($1, $2)";

/// Progress is logged every this many rows
const PROGRESS_INTERVAL: usize = 1_000_000;

pub fn insert_statement(backend: DbBackend, record: &Record) -> Statement {
    Statement::from_sql_and_values(backend, INSERT_STATEMENT, [
        record.id.into(),
        record.name.as_str().into(),
    ])
}

/// Inserts `records` one statement at a time inside one transaction.
///
/// Every row pays a full round trip; that cost is what this strategy
/// measures.
#[instrument(skip_all, fields(rows = records.len()))]
pub async fn load_row_by_row(
    db: &OrmConnect, records: &[Record],
) -> Result<u64, LoadError> {
    let tx = db.begin().await?;

    let work = insert_rows(&tx, records).await;
    let inserted = settle(tx, work).await?;

    info!(inserted, "Row-by-row load committed");
    Ok(inserted)
}

async fn insert_rows(
    tx: &SqlTransaction, records: &[Record],
) -> Result<u64, LoadError> {
    let backend = tx.get_database_backend();
    let mut inserted = 0;

    for (index, record) in records.iter().enumerate() {
        let result = tx
            .execute(insert_statement(backend, record))
            .await
            .map_err(LoadError::statement)?;
        inserted += result.rows_affected();

        if (index + 1) % PROGRESS_INTERVAL == 0 {
            debug!("Inserted {} of {} rows", index + 1, records.len());
        }
    }

    Ok(inserted)
}
