use std::time::Duration;

use tracing::Level;
use typed_builder::TypedBuilder;

pub trait DbConnectConfig {
    fn uri(&self) -> &str;
}

/// Configure database connection pool data
pub trait DbOptionsConfig {
    fn max_conn(&self) -> Option<u32> { None }

    /// `None` means connections are never recycled because of their age
    fn conn_max_lifetime(&self) -> Option<Duration> { None }
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct PostgresDbConfig {
    #[builder(setter(into))]
    pub uri: String,
    /// Upper bound for both open and idle connections
    #[builder(default = 10)]
    pub pool_size: u32,
    /// Zero disables lifetime based recycling
    #[builder(default)]
    pub conn_max_lifetime: Duration,
}

impl DbConnectConfig for PostgresDbConfig {
    fn uri(&self) -> &str { &self.uri }
}

impl DbOptionsConfig for PostgresDbConfig {
    fn max_conn(&self) -> Option<u32> { Some(self.pool_size) }

    fn conn_max_lifetime(&self) -> Option<Duration> {
        (!self.conn_max_lifetime.is_zero()).then_some(self.conn_max_lifetime)
    }
}

/// Behaviour of the mapping layer connection
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct OrmOptions {
    /// Cache and reuse server side statement plans
    #[builder(default)]
    pub prepare_statements: bool,
    /// Run single statements without an implicit transaction
    #[builder(default = true)]
    pub skip_default_transaction: bool,
    /// Refuse savepoints inside an open transaction
    #[builder(default = true)]
    pub disable_nested_transaction: bool,
    #[builder(default = Level::ERROR)]
    pub log_level: Level,
    #[builder(default)]
    pub color_output: bool,
}

impl Default for OrmOptions {
    fn default() -> Self { Self::builder().build() }
}

impl OrmOptions {
    /// Per statement logging is only kept when the log level lets it through
    pub fn logs_statements(&self) -> bool { self.log_level >= Level::INFO }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_lifetime_is_unlimited() {
        let config = PostgresDbConfig::builder()
            .uri("dbname=devel user=devel")
            .build();

        assert_eq!(config.max_conn(), Some(10));
        assert_eq!(config.conn_max_lifetime(), None);
    }

    #[test]
    fn test_non_zero_lifetime() {
        let config = PostgresDbConfig::builder()
            .uri("dbname=devel user=devel")
            .pool_size(4)
            .conn_max_lifetime(Duration::from_secs(30))
            .build();

        assert_eq!(config.max_conn(), Some(4));
        assert_eq!(config.conn_max_lifetime(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_orm_defaults() {
        let options = OrmOptions::default();

        assert!(!options.prepare_statements);
        assert!(options.skip_default_transaction);
        assert!(options.disable_nested_transaction);
        assert_eq!(options.log_level, Level::ERROR);
        assert!(!options.color_output);
        assert!(!options.logs_statements());
    }

    #[test]
    fn test_statement_logging_follows_level() {
        let options = OrmOptions::builder().log_level(Level::DEBUG).build();
        assert!(options.logs_statements());

        let options = OrmOptions::builder().log_level(Level::WARN).build();
        assert!(!options.logs_statements());
    }
}
