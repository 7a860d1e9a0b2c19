use crate::model::{DataKind, Entity, EntityMetadata, EntityName};

///
/// StreamColumn
/// One source-stream column bound to the data kind of its target attribute.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamColumn {
    name: String,
    ordinal: usize,
    data_kind: DataKind,
}

impl StreamColumn {
    #[must_use]
    pub fn new(name: impl Into<String>, ordinal: usize, data_kind: DataKind) -> Self {
        Self {
            name: name.into(),
            ordinal,
            data_kind,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn ordinal(&self) -> usize {
        self.ordinal
    }

    #[must_use]
    pub const fn data_kind(&self) -> DataKind {
        self.data_kind
    }
}

///
/// EntityMapping
///
/// Ordered stream columns for one import target. Fixed for the lifetime
/// of a transfer session; column `i` describes value `i` of every row.
///

#[derive(Clone, Debug)]
pub struct EntityMapping {
    target: EntityName,
    columns: Vec<StreamColumn>,
}

impl EntityMapping {
    #[must_use]
    pub const fn new(target: EntityName, columns: Vec<StreamColumn>) -> Self {
        Self { target, columns }
    }

    /// One column per entity attribute, in attribute order.
    #[must_use]
    pub fn from_entity(entity: &Entity) -> Self {
        let columns = entity
            .attribute_slice()
            .iter()
            .enumerate()
            .map(|(ordinal, attr)| StreamColumn::new(attr.name(), ordinal, attr.data_kind()))
            .collect();

        Self::new(entity.name().clone(), columns)
    }

    #[must_use]
    pub const fn target(&self) -> &EntityName {
        &self.target
    }

    #[must_use]
    pub fn columns(&self) -> &[StreamColumn] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, index: usize) -> Option<&StreamColumn> {
        self.columns.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
