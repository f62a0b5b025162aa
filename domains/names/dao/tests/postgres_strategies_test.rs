//! Loads against a real PostgreSQL; run with `cargo test -- --ignored` on a
//! machine with Docker.

use std::num::NonZeroUsize;

use common_errors::LoadError;
use names_dao::{load_batched, load_bulk_copy, load_row_by_row};
use names_models::Record;
use sql_connection::{OrmOptions, connect_orm_db, connect_postgres_db};
use test_utils::{TestPostgresContainer, as_name_set, count_names, fetch_names};

fn records(n: i32) -> Vec<Record> {
    (1..=n).map(|id| Record::new(id, format!("Adam_{id}"))).collect()
}

/// `n` records where the last one repeats the id of the middle one
fn records_with_duplicate(n: i32) -> Vec<Record> {
    let mut data = records(n);
    data.push(Record::new(n / 2, "Adam_duplicate"));
    data
}

fn chunk(size: usize) -> NonZeroUsize { NonZeroUsize::new(size).unwrap() }

#[tokio::test]
#[ignore = "requires docker"]
async fn test_bulk_copy_loads_every_record() -> anyhow::Result<()> {
    let container = TestPostgresContainer::new().await?;
    let db = connect_postgres_db(&container.db_config()).await?;
    let data = records(1_000);

    let copied = load_bulk_copy(&db, &data).await?;

    assert_eq!(copied, 1_000);
    // COPY gives no ordering guarantee; compare as sets
    assert_eq!(fetch_names(&container).await?, as_name_set(&data));
    db.close();
    Ok(())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_orm_strategies_load_every_record() -> anyhow::Result<()> {
    let container = TestPostgresContainer::new().await?;
    let data = records(250);

    let db = connect_orm_db(&container.db_config(), OrmOptions::default())
        .await?;
    assert_eq!(load_row_by_row(&db, &data).await?, 250);
    assert_eq!(fetch_names(&container).await?, as_name_set(&data));

    container.execute_sql("TRUNCATE names").await?;
    assert_eq!(load_batched(&db, &data, chunk(100)).await?, 250);
    assert_eq!(fetch_names(&container).await?, as_name_set(&data));

    db.close().await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_empty_record_set_commits_zero_rows() -> anyhow::Result<()> {
    let container = TestPostgresContainer::new().await?;

    let pg = connect_postgres_db(&container.db_config()).await?;
    assert_eq!(load_bulk_copy(&pg, &[]).await?, 0);

    let orm = connect_orm_db(&container.db_config(), OrmOptions::default())
        .await?;
    assert_eq!(load_row_by_row(&orm, &[]).await?, 0);
    assert_eq!(load_batched(&orm, &[], chunk(2)).await?, 0);

    assert_eq!(count_names(&container).await?, 0);
    Ok(())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_bulk_copy_duplicate_rolls_back_everything() -> anyhow::Result<()>
{
    let container = TestPostgresContainer::with_unique_ids().await?;
    let db = connect_postgres_db(&container.db_config()).await?;

    let err = load_bulk_copy(&db, &records_with_duplicate(500))
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Statement(_)));
    assert_eq!(count_names(&container).await?, 0);
    Ok(())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_row_by_row_duplicate_rolls_back_everything()
-> anyhow::Result<()> {
    let container = TestPostgresContainer::with_unique_ids().await?;
    let db = connect_orm_db(&container.db_config(), OrmOptions::default())
        .await?;

    let err = load_row_by_row(&db, &records_with_duplicate(50))
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Statement(_)));
    assert_eq!(count_names(&container).await?, 0);
    Ok(())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_batched_duplicate_rolls_back_everything() -> anyhow::Result<()> {
    let container = TestPostgresContainer::with_unique_ids().await?;
    let db = connect_orm_db(&container.db_config(), OrmOptions::default())
        .await?;

    // The duplicate lands in the last chunk, after two committed-looking ones
    let err = load_batched(&db, &records_with_duplicate(60), chunk(25))
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Statement(_)));
    assert_eq!(count_names(&container).await?, 0);
    Ok(())
}
