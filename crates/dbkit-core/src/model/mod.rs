//! Schema snapshot vocabulary: attributes, entities, and rows.

mod attribute;
mod entity;
mod row;


pub use attribute::{Attribute, DataKind};
pub use entity::{Entity, EntityError, EntityMetadata, EntityName};
pub use row::Row;
