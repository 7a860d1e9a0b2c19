use crate::{
    error::InternalError,
    model::{DataKind, EntityName},
    value::Value,
};

///
/// ColumnMeta
/// Describes one column of a result set.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnMeta {
    pub ordinal: usize,
    pub name: String,
    pub data_kind: DataKind,
}

///
/// ResultSetMeta
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResultSetMeta {
    pub columns: Vec<ColumnMeta>,
}

impl ResultSetMeta {
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|col| col.name == name)
    }
}

///
/// RowMeta
/// Identity of the row a value came from, when the source tracks one.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RowMeta {
    pub entity: EntityName,
    pub key_columns: Vec<usize>,
}

///
/// ResultSet
///
/// Read contract consumed by import pipelines. Ordinal access is the only
/// required lookup; the remaining accessors describe optional capabilities
/// and report "unavailable" rather than failing.
///

pub trait ResultSet {
    /// Value of column `index` in the current row.
    fn attribute_value(&self, index: usize) -> Result<Value, InternalError>;

    fn attribute_value_by_name(&self, _name: &str) -> Result<Option<Value>, InternalError> {
        Ok(None)
    }

    fn attribute_value_meta(&self, _index: usize) -> Option<ColumnMeta> {
        None
    }

    fn row_meta(&self) -> Option<RowMeta> {
        None
    }

    /// Advance to the next row. Returns false when there is none.
    fn next_row(&mut self) -> Result<bool, InternalError> {
        Ok(false)
    }

    /// Position the cursor at `position`. Returns false when not possible.
    fn move_to(&mut self, _position: usize) -> Result<bool, InternalError> {
        Ok(false)
    }

    fn meta(&self) -> ResultSetMeta;

    fn result_set_name(&self) -> Option<&str> {
        None
    }

    fn close(&mut self) {}
}
