use std::{num::NonZeroUsize, str::FromStr, time::Duration};

use anyhow::{Context, anyhow, bail};
use names_dao::{DEFAULT_CHUNK_SIZE, Strategy};
use sql_connection::{OrmOptions, PostgresDbConfig};
use typed_builder::TypedBuilder;

use crate::generator::{DEFAULT_PREFIX, MAX_ROWS, RowCountError};

pub const DEFAULT_DSN: &str = "database=devel user=devel sslmode=disable";
pub const DEFAULT_ROWS: usize = 15_000_000;

/// Everything a benchmark run needs, passed explicitly to the runner
#[derive(Debug, Clone, TypedBuilder)]
pub struct BenchConfig {
    #[builder(default = PostgresDbConfig::builder().uri(DEFAULT_DSN).build())]
    pub database: PostgresDbConfig,
    #[builder(default = DEFAULT_ROWS)]
    pub rows: usize,
    #[builder(default = DEFAULT_PREFIX.to_string(), setter(into))]
    pub name_prefix: String,
    /// Rows per statement for every batched strategy of the run
    #[builder(default = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: NonZeroUsize,
    #[builder(default)]
    pub orm: OrmOptions,
    /// Empty the table on each fresh handle before its timer starts
    #[builder(default)]
    pub truncate_before_run: bool,
    #[builder(default = Strategy::all(DEFAULT_CHUNK_SIZE).to_vec())]
    pub strategies: Vec<Strategy>,
}

impl Default for BenchConfig {
    fn default() -> Self { Self::builder().build() }
}

impl BenchConfig {
    /// Defaults overridden by `BENCH_*` environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(uri) = lookup("BENCH_DATABASE_URL") {
            config.database.uri = uri;
        }
        if let Some(size) = parse_var(&lookup, "BENCH_POOL_SIZE")? {
            config.database.pool_size = size;
        }
        if let Some(secs) = parse_var(&lookup, "BENCH_CONN_LIFETIME_SECS")? {
            config.database.conn_max_lifetime = Duration::from_secs(secs);
        }
        if let Some(rows) = parse_var(&lookup, "BENCH_ROWS")? {
            config.rows = rows;
        }
        if let Some(chunk_size) = parse_var(&lookup, "BENCH_CHUNK_SIZE")? {
            config.chunk_size = chunk_size;
        }
        if let Some(prepare) = flag_var(&lookup, "BENCH_PREPARE")? {
            config.orm.prepare_statements = prepare;
        }
        if let Some(truncate) = flag_var(&lookup, "BENCH_TRUNCATE")? {
            config.truncate_before_run = truncate;
        }
        if let Some(list) = lookup("BENCH_STRATEGIES") {
            config.strategies = list
                .split(',')
                .filter(|item| !item.trim().is_empty())
                .map(str::parse::<Strategy>)
                .collect::<Result<_, _>>()
                .context("invalid value for BENCH_STRATEGIES")?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.pool_size == 0 {
            bail!("pool size must be at least 1");
        }
        if self.rows > MAX_ROWS {
            return Err(RowCountError(self.rows).into());
        }
        if self.strategies.is_empty() {
            bail!("no strategy selected");
        }
        Ok(())
    }

    /// Selected strategies in run order, without repeats, batched ones
    /// using the configured chunk size.
    pub fn plan(&self) -> Vec<Strategy> {
        let mut plan: Vec<Strategy> = self
            .strategies
            .iter()
            .map(|strategy| match strategy {
                Strategy::BatchedSlice { .. } => Strategy::BatchedSlice {
                    chunk_size: self.chunk_size,
                },
                other => *other,
            })
            .collect();
        plan.sort_by_key(Strategy::rank);
        plan.dedup();
        plan
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>, key: &str,
) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("invalid value for {key}: {raw:?}"))
        })
        .transpose()
}

fn flag_var(
    lookup: &impl Fn(&str) -> Option<String>, key: &str,
) -> anyhow::Result<Option<bool>> {
    lookup(key)
        .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(anyhow!("invalid value for {key}: {raw:?}")),
        })
        .transpose()
}
