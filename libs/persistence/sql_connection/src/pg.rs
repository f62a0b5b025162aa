use common_errors::LoadError;
use deadpool_postgres::{
    Hook, HookError, Manager, ManagerConfig, Pool, RecyclingMethod, Runtime,
};
use tokio_postgres::NoTls;
use tracing::{debug, info, instrument};

use crate::{
    SqlConnect,
    config::{DbConnectConfig, DbOptionsConfig},
    dsn::parse_dsn,
};

/// Opens the direct protocol pool and dials it once.
///
/// The pool keeps up to `max_conn` connections, open or idle. Connections
/// older than the configured lifetime are dropped instead of recycled.
#[instrument(skip_all, name = "connect-pgsql")]
pub async fn connect_postgres_db<C>(config: &C) -> Result<SqlConnect, LoadError>
where
    C: DbConnectConfig + DbOptionsConfig,
{
    let pg_config = parse_dsn(config.uri())?;

    info!(
        postgres.dbname = pg_config.get_dbname(),
        postgres.max_conn = ?config.max_conn(),
        postgres.conn_max_lifetime = ?config.conn_max_lifetime()
    );

    let mgr_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(pg_config, NoTls, mgr_config);

    let mut pool_builder = Pool::builder(mgr).runtime(Runtime::Tokio1);

    if let Some(max_conn) = config.max_conn() {
        pool_builder = pool_builder.max_size(max_conn as usize);
    }

    if let Some(lifetime) = config.conn_max_lifetime() {
        pool_builder =
            pool_builder.pre_recycle(Hook::sync_fn(move |_, metrics| {
                if metrics.age() > lifetime {
                    Err(HookError::Message(
                        "connection exceeded its maximum lifetime".into(),
                    ))
                }
                else {
                    Ok(())
                }
            }));
    }

    let pool = pool_builder.build().map_err(LoadError::connection)?;

    // Single dial, no retries
    let client = pool.get().await.map_err(LoadError::connection)?;
    drop(client);

    let status = pool.status();
    debug!(
        "Direct protocol pool ready: {} of {} connections available",
        status.available, status.max_size
    );

    Ok(SqlConnect::new(pool))
}
