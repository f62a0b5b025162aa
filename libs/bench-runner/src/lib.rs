pub mod config;
pub mod generator;
pub mod report;
pub mod runner;

pub use config::BenchConfig;
pub use generator::{
    DEFAULT_PREFIX, MAX_ROWS, RowCountError, generate, generate_with_prefix,
};
pub use report::RunReport;
pub use runner::{BenchmarkRunner, RunnerError};
