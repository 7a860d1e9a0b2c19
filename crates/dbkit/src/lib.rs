//! ## Crate layout
//! - `core`: attribute metadata, values, dialects, the statement generator,
//!   the stream result-set adapter, and observability.
//! - `error`: public error type with a stable kind + origin taxonomy.
//! - `Generator` / `Importer`: public entrypoints over the core runtime.
//!
//! The `prelude` module carries the vocabulary most callers need.

pub use dbkit_core as core;

pub mod error;
mod session;

pub use error::Error;
pub use session::{Generator, Importer};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        dialect::{DialectKind, SqlDialect as _},
        generate::{RowSelection, Selection, SelectionKind, StatementKind},
        model::{Attribute, DataKind, Entity, EntityMetadata as _, EntityName, Row},
        transfer::{EntityMapping, ResultSet as _, StreamColumn},
        value::{DisplayFormat, Value},
    };
    pub use crate::{Error, Generator, Importer};
}
