use std::{io::Write, time::{Duration, Instant}};

use common_errors::LoadError;
use names_dao::{Strategy, load_batched, load_bulk_copy, load_row_by_row};
use names_models::{Record, TABLE_NAME};
use sql_connection::{
    OrmConnect, connect_orm_db, connect_postgres_db,
    sea_orm::{DbBackend, Statement},
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{
    config::BenchConfig,
    generator::{RowCountError, generate_with_prefix},
    report::RunReport,
};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    RowCount(#[from] RowCountError),
    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// Runs each selected strategy against its own fresh connection handle,
/// one after the other, and stops at the first failure.
pub struct BenchmarkRunner {
    config: BenchConfig,
}

impl BenchmarkRunner {
    pub fn new(config: BenchConfig) -> Self { Self { config } }

    pub fn config(&self) -> &BenchConfig { &self.config }

    /// Generates the configured records and benchmarks them
    pub async fn run(
        &self, out: &mut impl Write,
    ) -> Result<Vec<RunReport>, RunnerError> {
        let started = Instant::now();
        let records =
            generate_with_prefix(self.config.rows, &self.config.name_prefix)?;
        info!(
            rows = records.len(),
            "Generated records in {:.2}s",
            started.elapsed().as_secs_f64()
        );

        self.run_with(&records, out).await
    }

    /// Benchmarks an already generated record set
    #[instrument(skip_all, fields(rows = records.len()))]
    pub async fn run_with(
        &self, records: &[Record], out: &mut impl Write,
    ) -> Result<Vec<RunReport>, RunnerError> {
        writeln!(out, "rows: {}", records.len())?;

        let plan = self.config.plan();
        let mut reports = Vec::with_capacity(plan.len());
        for strategy in plan {
            info!("Running strategy: {strategy}");
            let report = match self.run_strategy(strategy, records).await {
                Ok(report) => report,
                Err(e) => {
                    warn!(
                        kind = e.kind(),
                        "Strategy '{strategy}' failed: {e}"
                    );
                    return Err(e.into());
                }
            };
            info!(
                "Strategy '{strategy}' completed in {:.2}s",
                report.elapsed.as_secs_f64()
            );
            writeln!(out, "{report}")?;
            out.flush()?;
            reports.push(report);
        }

        Ok(reports)
    }

    async fn run_strategy(
        &self, strategy: Strategy, records: &[Record],
    ) -> Result<RunReport, LoadError> {
        let prepare = self.config.orm.prepare_statements;
        let (flags, elapsed) = match strategy {
            Strategy::BulkCopy => (
                format!("pool: {}", self.config.database.pool_size),
                self.run_bulk_copy(records).await?,
            ),
            Strategy::RowByRow => (
                format!("prepare: {prepare}"),
                self.run_orm(async |db| load_row_by_row(db, records).await)
                    .await?,
            ),
            Strategy::BatchedSlice { chunk_size } => (
                format!("prepare: {prepare}, chunk: {chunk_size}"),
                self.run_orm(async |db| {
                    load_batched(db, records, chunk_size).await
                })
                .await?,
            ),
        };

        Ok(RunReport::new(strategy, flags, records.len(), elapsed))
    }

    async fn run_bulk_copy(
        &self, records: &[Record],
    ) -> Result<Duration, LoadError> {
        let db = connect_postgres_db(&self.config.database).await?;
        if self.config.truncate_before_run {
            db.batch_execute(&format!("TRUNCATE {TABLE_NAME}")).await?;
        }

        let timer = Instant::now();
        let result = load_bulk_copy(&db, records).await;
        let elapsed = timer.elapsed();
        db.close();

        result.map(|_| elapsed)
    }

    async fn run_orm(
        &self, load: impl AsyncFnOnce(&OrmConnect) -> Result<u64, LoadError>,
    ) -> Result<Duration, LoadError> {
        let db =
            connect_orm_db(&self.config.database, self.config.orm.clone())
                .await?;
        if self.config.truncate_before_run {
            db.execute(Statement::from_string(
                DbBackend::Postgres,
                format!("TRUNCATE {TABLE_NAME}"),
            ))
            .await?;
        }

        let timer = Instant::now();
        let result = load(&db).await;
        let elapsed = timer.elapsed();
        let closed = db.close().await;

        result?;
        closed.map(|_| elapsed)
    }
}
