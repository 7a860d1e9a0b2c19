//! Core runtime for dbkit: attribute metadata, values, SQL dialects, the
//! statement generator, the stream result-set adapter, and observability.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod dialect;
pub mod error;
pub mod generate;
pub mod model;
pub mod obs;
pub mod transfer;
pub mod value;

#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Source table name used by generated MERGE statements.
///
/// The caller is expected to replace it with the real staging table.
pub const MERGE_SOURCE_TABLE: &str = "SOURCE_TABLE";

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        dialect::SqlDialect,
        generate::{SelectionKind, StatementKind},
        model::{Attribute, DataKind, Entity, EntityMetadata, EntityName, Row},
        transfer::{ResultSet, StreamColumn},
        value::Value,
    };
}
