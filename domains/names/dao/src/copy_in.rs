use common_errors::LoadError;
use database_traits::transaction::{PgTransaction, settle};
use futures::pin_mut;
use names_models::Record;
use sql_connection::SqlConnect;
use tokio_postgres::{binary_copy::BinaryCopyInWriter, types::Type};
use tracing::{debug, info, instrument};

pub const COPY_STATEMENT: &str =
    "COPY names (id, name) FROM STDIN (FORMAT binary)";

/// Column types of the binary COPY stream, in statement order
const COPY_TYPES: [Type; 2] = [Type::INT4, Type::VARCHAR];

/// Loads `records` with a single COPY inside one transaction.
///
/// Returns the number of rows the server reports as copied.
#[instrument(skip_all, fields(rows = records.len()))]
pub async fn load_bulk_copy(
    db: &SqlConnect, records: &[Record],
) -> Result<u64, LoadError> {
    let mut client = db.get_client().await.map_err(LoadError::connection)?;
    let tx = PgTransaction(
        client.transaction().await.map_err(LoadError::connection)?,
    );

    let work = stream_records(&tx, records).await;
    let copied = settle(tx, work).await?;

    info!(copied, "Bulk copy committed");
    Ok(copied)
}

async fn stream_records(
    tx: &PgTransaction<'_>, records: &[Record],
) -> Result<u64, LoadError> {
    let sink = tx
        .copy_in(COPY_STATEMENT)
        .await
        .map_err(LoadError::statement)?;
    let writer = BinaryCopyInWriter::new(sink, &COPY_TYPES);
    pin_mut!(writer);

    for record in records {
        writer
            .as_mut()
            .write(&[&record.id, &record.name])
            .await
            .map_err(LoadError::statement)?;
    }

    // Flushes buffered rows; constraint violations surface here
    let copied = writer.finish().await.map_err(LoadError::statement)?;
    debug!(copied, "Copy stream finished");
    Ok(copied)
}
