use std::num::NonZeroUsize;

use common_errors::LoadError;
use database_traits::transaction::{SqlTransaction, settle};
use names_models::{NameActiveModel, NameEntity, Record};
use sea_orm::{ConnectionTrait, DbBackend, EntityTrait, QueryTrait, Statement};
use sql_connection::OrmConnect;
use tracing::{debug, info, instrument};

use crate::strategy::chunk_count;

/// Multi-row INSERT covering every record of `chunk`
pub fn chunk_statement(backend: DbBackend, chunk: &[Record]) -> Statement {
    NameEntity::insert_many(chunk.iter().map(NameActiveModel::from))
        .build(backend)
}

/// Inserts `records` as contiguous chunks of at most `chunk_size` rows, one
/// statement per chunk, inside one transaction.
#[instrument(
    skip_all,
    fields(rows = records.len(), chunk_size = chunk_size.get())
)]
pub async fn load_batched(
    db: &OrmConnect, records: &[Record], chunk_size: NonZeroUsize,
) -> Result<u64, LoadError> {
    let tx = db.begin().await?;

    let work = insert_chunks(&tx, records, chunk_size).await;
    let inserted = settle(tx, work).await?;

    info!(inserted, "Batched load committed");
    Ok(inserted)
}

async fn insert_chunks(
    tx: &SqlTransaction, records: &[Record], chunk_size: NonZeroUsize,
) -> Result<u64, LoadError> {
    let backend = tx.get_database_backend();
    let chunks = chunk_count(records.len(), chunk_size);
    let mut inserted = 0;

    for (index, chunk) in records.chunks(chunk_size.get()).enumerate() {
        let result = tx
            .execute(chunk_statement(backend, chunk))
            .await
            .map_err(LoadError::statement)?;
        inserted += result.rows_affected();

        debug!(
            "Chunk {}/{}: {} rows",
            index + 1,
            chunks,
            chunk.len()
        );
    }

    Ok(inserted)
}
