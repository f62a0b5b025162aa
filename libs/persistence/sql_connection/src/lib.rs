pub use config::{DbConnectConfig, DbOptionsConfig, OrmOptions, PostgresDbConfig};
pub use database_traits;
pub use impl_get_connect::{OrmConnect, SqlConnect};
pub use sea_orm;

pub mod config;
mod dsn;
mod impl_get_connect;
mod orm;
mod pg;

pub use dsn::parse_dsn;
pub use orm::connect_orm_db;
pub use pg::connect_postgres_db;
