use crate::{
    error::InternalError,
    model::{Attribute, DataKind, Entity, EntityMetadata, EntityName},
};

/// `EMPLOYEE [ID(key, NUMERIC), NAME(STRING), HIRE_DATE(DATETIME, default '')]`
pub(crate) fn employee() -> Entity {
    Entity::new(
        EntityName::new("EMPLOYEE"),
        vec![
            Attribute::new("ID", 0, DataKind::Numeric).in_unique_key(),
            Attribute::new("NAME", 1, DataKind::String),
            Attribute::new("HIRE_DATE", 2, DataKind::Datetime).with_default(""),
        ],
    )
    .expect("employee fixture")
}

/// Same attributes as `employee`, but no unique key.
pub(crate) fn employee_without_key() -> Entity {
    Entity::new(
        EntityName::new("EMPLOYEE"),
        vec![
            Attribute::new("ID", 0, DataKind::Numeric),
            Attribute::new("NAME", 1, DataKind::String),
            Attribute::new("HIRE_DATE", 2, DataKind::Datetime).with_default(""),
        ],
    )
    .expect("employee fixture")
}

///
/// BrokenMetadata
/// Metadata provider whose key lookup always fails.
///

pub(crate) struct BrokenMetadata {
    pub(crate) name: EntityName,
}

impl EntityMetadata for BrokenMetadata {
    fn name(&self) -> &EntityName {
        &self.name
    }

    fn attributes(&self) -> Result<Vec<Attribute>, InternalError> {
        Ok(vec![Attribute::new("ID", 0, DataKind::Numeric)])
    }

    fn unique_key(&self) -> Result<Vec<Attribute>, InternalError> {
        Err(InternalError::metadata_internal("catalog connection lost"))
    }
}
