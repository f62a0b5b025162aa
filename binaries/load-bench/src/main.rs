use bench_runner::{BenchConfig, BenchmarkRunner};
use sql_connection::OrmOptions;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = BenchConfig::from_env()?;
    init_tracing(&config.orm);

    info!(
        rows = config.rows,
        pool_size = config.database.pool_size,
        "Starting bulk insert benchmark"
    );

    let runner = BenchmarkRunner::new(config);
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = runner.run(&mut stdout).await {
        error!("Benchmark aborted: {e}");
        return Err(e.into());
    }

    Ok(())
}

/// Logs go to stderr; stdout only carries the report lines
fn init_tracing(orm: &OrmOptions) {
    let orm_level = orm.log_level.as_str().to_ascii_lowercase();
    let directives = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        format!("info,sqlx={orm_level},sea_orm={orm_level}")
    });

    tracing_subscriber::registry()
        .with(EnvFilter::new(directives))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(orm.color_output)
                .with_writer(std::io::stderr),
        )
        .init();
}
