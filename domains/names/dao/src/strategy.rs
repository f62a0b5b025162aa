use std::{fmt, num::NonZeroUsize, str::FromStr};

use thiserror::Error;

/// Rows per multi-row insert; 30 000 rows of two columns stays under the
/// 65 535 bind parameter limit of a single statement.
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = match NonZeroUsize::new(30_000) {
    Some(size) => size,
    None => unreachable!(),
};

/// The insertion paths being compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// COPY FROM STDIN over the direct protocol connection
    BulkCopy,
    /// One parameterized INSERT per record through the mapping layer
    RowByRow,
    /// One multi-row INSERT per chunk through the mapping layer
    BatchedSlice { chunk_size: NonZeroUsize },
}

impl Strategy {
    /// Every strategy, in the order a benchmark runs them
    pub fn all(chunk_size: NonZeroUsize) -> [Self; 3] {
        [Self::BulkCopy, Self::RowByRow, Self::BatchedSlice { chunk_size }]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::BulkCopy => "bulk copy",
            Self::RowByRow => "orm row-by-row",
            Self::BatchedSlice { .. } => "orm batched",
        }
    }

    /// Position in the fixed run order
    pub fn rank(&self) -> u8 {
        match self {
            Self::BulkCopy => 0,
            Self::RowByRow => 1,
            Self::BatchedSlice { .. } => 2,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error(
    "unknown strategy `{0}`, expected one of: bulk-copy, row-by-row, batched"
)]
pub struct ParseStrategyError(pub String);

/// Parses `bulk-copy`, `row-by-row` or `batched`; batched strategies get the
/// default chunk size.
impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bulk-copy" | "copy" => Ok(Self::BulkCopy),
            "row-by-row" | "rows" => Ok(Self::RowByRow),
            "batched" | "batched-slice" => Ok(Self::BatchedSlice {
                chunk_size: DEFAULT_CHUNK_SIZE,
            }),
            other => Err(ParseStrategyError(other.to_string())),
        }
    }
}

/// Number of multi-row statements needed for `len` records
pub fn chunk_count(len: usize, chunk_size: NonZeroUsize) -> usize {
    len.div_ceil(chunk_size.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize { NonZeroUsize::new(n).unwrap() }

    #[test]
    fn test_run_order() {
        let order = Strategy::all(size(2));
        assert_eq!(order[0], Strategy::BulkCopy);
        assert_eq!(order[1], Strategy::RowByRow);
        assert_eq!(order[2], Strategy::BatchedSlice {
            chunk_size: size(2)
        });
        assert!(order.windows(2).all(|w| w[0].rank() < w[1].rank()));
    }

    #[test]
    fn test_chunk_count() {
        assert_eq!(chunk_count(5, size(2)), 3);
        assert_eq!(chunk_count(4, size(2)), 2);
        assert_eq!(chunk_count(0, size(2)), 0);
        assert_eq!(chunk_count(15_000_000, DEFAULT_CHUNK_SIZE), 500);
        assert_eq!(chunk_count(1, DEFAULT_CHUNK_SIZE), 1);
    }

    #[test]
    fn test_parse() {
        assert_eq!("bulk-copy".parse::<Strategy>(), Ok(Strategy::BulkCopy));
        assert_eq!(" Row-By-Row ".parse::<Strategy>(), Ok(Strategy::RowByRow));
        assert_eq!(
            "batched".parse::<Strategy>(),
            Ok(Strategy::BatchedSlice {
                chunk_size: DEFAULT_CHUNK_SIZE
            })
        );
        assert_eq!(
            "gorm".parse::<Strategy>(),
            Err(ParseStrategyError("gorm".to_string()))
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(Strategy::RowByRow.to_string(), "orm row-by-row");
    }
}
