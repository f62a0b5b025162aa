use common_errors::LoadError;
use sea_orm::SqlxPostgresConnector;
use sqlx::{ConnectOptions, Connection, postgres::PgPoolOptions};
use tracing::{debug, info, instrument};

use crate::{
    OrmConnect,
    config::{DbConnectConfig, DbOptionsConfig, OrmOptions},
    dsn::{parse_dsn, pg_connect_options},
};

/// Statement plans kept per connection when prepared statements are on
const STATEMENT_CACHE_CAPACITY: usize = 100;

/// Opens the mapping layer connection.
///
/// The sqlx pool is sized and tuned before sea-orm wraps it, so there is no
/// handle to extract and reconfigure afterwards.
#[instrument(skip_all, name = "connect-orm")]
pub async fn connect_orm_db<C>(
    config: &C, options: OrmOptions,
) -> Result<OrmConnect, LoadError>
where
    C: DbConnectConfig + DbOptionsConfig,
{
    let pg_config = parse_dsn(config.uri())?;

    info!(
        orm.dbname = pg_config.get_dbname(),
        orm.max_conn = ?config.max_conn(),
        orm.prepare_statements = options.prepare_statements,
        orm.skip_default_transaction = options.skip_default_transaction,
        orm.disable_nested_transaction = options.disable_nested_transaction
    );

    let cache_capacity = if options.prepare_statements {
        STATEMENT_CACHE_CAPACITY
    }
    else {
        0
    };
    let mut connect_options = pg_connect_options(&pg_config)
        .statement_cache_capacity(cache_capacity);
    if !options.logs_statements() {
        connect_options = connect_options.disable_statement_logging();
    }

    // Single dial, no retries; the pool itself opens connections lazily
    let probe = connect_options
        .connect()
        .await
        .map_err(LoadError::connection)?;
    probe.close().await.map_err(LoadError::connection)?;

    let mut pool_options = PgPoolOptions::new()
        .idle_timeout(None)
        .max_lifetime(config.conn_max_lifetime());
    if let Some(max_conn) = config.max_conn() {
        pool_options = pool_options.max_connections(max_conn);
    }

    let pool = pool_options.connect_lazy_with(connect_options);
    debug!(max_conn = ?config.max_conn(), "Mapping layer pool ready");

    let db = SqlxPostgresConnector::from_sqlx_postgres_pool(pool);
    Ok(OrmConnect::new(db, options))
}
