use crate::value::Value;
use derive_more::{Deref, From, IntoIterator};

///
/// Row
///
/// Ordered raw values, one per source column.
/// Rows are replaced wholesale; there is no per-cell mutation.
///

#[derive(Clone, Debug, Default, Deref, From, IntoIterator, PartialEq)]
pub struct Row(#[into_iterator(owned, ref)] Vec<Value>);

impl Row {
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

impl FromIterator<Value> for Row {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
