use names_models::{Record, RecordSet};
use thiserror::Error;

pub const DEFAULT_PREFIX: &str = "Adam";

/// Largest record count whose ids still fit the `integer` id column
pub const MAX_ROWS: usize = i32::MAX as usize;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("row count {0} exceeds the 32-bit id range")]
pub struct RowCountError(pub usize);

/// `n` records with ids `1..=n` in order, named `Adam_<id>`
pub fn generate(n: usize) -> Result<RecordSet, RowCountError> {
    generate_with_prefix(n, DEFAULT_PREFIX)
}

/// `n` records with ids `1..=n` in order, named `<prefix>_<id>`.
///
/// Fails when `n` exceeds [`MAX_ROWS`].
pub fn generate_with_prefix(
    n: usize, prefix: &str,
) -> Result<RecordSet, RowCountError> {
    let last = i32::try_from(n).map_err(|_| RowCountError(n))?;

    Ok((1..=last)
        .map(|id| Record::new(id, format!("{prefix}_{id}")))
        .collect())
}
