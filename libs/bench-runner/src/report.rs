use std::{fmt, time::Duration};

use names_dao::Strategy;

/// Outcome of one timed strategy
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub strategy: Strategy,
    /// Connection settings the timing was taken with, e.g. `pool: 10`
    pub flags: String,
    pub rows: usize,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn new(
        strategy: Strategy, flags: impl Into<String>, rows: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            strategy,
            flags: flags.into(),
            rows,
            elapsed,
        }
    }

    pub fn rows_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 { self.rows as f64 / secs } else { 0.0 }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {:?} ({:.0} rows/s)",
            self.strategy,
            self.flags,
            self.elapsed,
            self.rows_per_sec()
        )
    }
}
