pub mod batched;
pub mod copy_in;
pub mod row_by_row;
pub mod strategy;

pub use batched::{chunk_statement, load_batched};
pub use copy_in::{COPY_STATEMENT, load_bulk_copy};
pub use row_by_row::{INSERT_STATEMENT, insert_statement, load_row_by_row};
pub use strategy::{DEFAULT_CHUNK_SIZE, ParseStrategyError, Strategy, chunk_count};
