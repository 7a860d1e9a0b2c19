//! External-row adapter.
//!
//! Presents rows pushed from a non-database source (delimited text, JSON
//! lines) through the `ResultSet` read contract, converting textual
//! DATETIME values on demand.

mod mapping;
mod pattern;
mod producer;
mod result_set;
mod stream;

#[cfg(test)]
mod tests;

// re-exports
pub use mapping::{EntityMapping, StreamColumn};
pub use pattern::{DateTimePattern, PatternError};
pub use producer::{StreamRowProducer, transfer_rows};
pub use result_set::{ColumnMeta, ResultSet, ResultSetMeta, RowMeta};
pub use stream::{ConversionOutcome, RowError, StreamResultSet};
