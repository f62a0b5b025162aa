use std::collections::BTreeSet;

use anyhow::Result;
use names_models::Record;

use crate::TestPostgresContainer;

/// Number of rows currently in `names`
pub async fn count_names(container: &TestPostgresContainer) -> Result<i64> {
    let client = container.pool.get().await?;
    let row = client.query_one("SELECT COUNT(*) FROM names", &[]).await?;
    Ok(row.get(0))
}

/// Contents of `names` as a set; load order is not part of the contract
pub async fn fetch_names(
    container: &TestPostgresContainer,
) -> Result<BTreeSet<(i32, String)>> {
    let client = container.pool.get().await?;
    let rows = client.query("SELECT id, name FROM names", &[]).await?;
    Ok(rows.iter().map(|row| (row.get(0), row.get(1))).collect())
}

/// Expected table contents after loading `records`
pub fn as_name_set(records: &[Record]) -> BTreeSet<(i32, String)> {
    records
        .iter()
        .map(|record| (record.id, record.name.clone()))
        .collect()
}
