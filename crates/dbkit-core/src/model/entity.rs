use crate::{error::InternalError, model::Attribute};
use std::{collections::BTreeSet, fmt};
use thiserror::Error as ThisError;

///
/// EntityError
/// Invariant violations while assembling an entity snapshot.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum EntityError {
    #[error("entity '{entity}' has no attributes")]
    NoAttributes { entity: String },

    #[error("entity '{entity}' declares attribute '{attribute}' more than once")]
    DuplicateAttribute { entity: String, attribute: String },

    #[error("entity '{entity}' key references unknown attribute '{attribute}'")]
    UnknownKeyAttribute { entity: String, attribute: String },
}

///
/// EntityName
/// Optionally qualified entity name (`catalog.schema.name`).
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct EntityName {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: String,
}

impl EntityName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    #[must_use]
    pub fn in_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Name parts from outermost container to the entity itself.
    #[must_use]
    pub fn parts(&self) -> Vec<&str> {
        self.catalog
            .as_deref()
            .into_iter()
            .chain(self.schema.as_deref())
            .chain(std::iter::once(self.name.as_str()))
            .collect()
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts().join("."))
    }
}

///
/// EntityMetadata
///
/// Schema/metadata provider for one entity. Lookups are fallible because
/// real providers read catalogs lazily; any failure aborts generation.
///

pub trait EntityMetadata {
    fn name(&self) -> &EntityName;

    /// All attributes, in schema order.
    fn attributes(&self) -> Result<Vec<Attribute>, InternalError>;

    /// Best available unique-key attribute subset (possibly empty).
    fn unique_key(&self) -> Result<Vec<Attribute>, InternalError>;
}

///
/// Entity
/// Immutable schema snapshot of a table.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entity {
    name: EntityName,
    attributes: Vec<Attribute>,
    unique_key: Vec<Attribute>,
}

impl Entity {
    /// Build a snapshot whose unique key is taken from the attributes'
    /// own `unique_key` flags.
    pub fn new(name: EntityName, attributes: Vec<Attribute>) -> Result<Self, EntityError> {
        let key = attributes
            .iter()
            .filter(|attr| attr.is_unique_key())
            .map(|attr| attr.name().to_string())
            .collect::<Vec<_>>();

        Self::with_key(name, attributes, &key)
    }

    /// Build a snapshot with an explicit unique key (attribute names).
    pub fn with_key<S: AsRef<str>>(
        name: EntityName,
        attributes: Vec<Attribute>,
        key: &[S],
    ) -> Result<Self, EntityError> {
        if attributes.is_empty() {
            return Err(EntityError::NoAttributes {
                entity: name.to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        for attr in &attributes {
            if !seen.insert(attr.name()) {
                return Err(EntityError::DuplicateAttribute {
                    entity: name.to_string(),
                    attribute: attr.name().to_string(),
                });
            }
        }

        let mut unique_key = Vec::with_capacity(key.len());
        for key_name in key {
            let key_name = key_name.as_ref();
            let attr = attributes
                .iter()
                .find(|attr| attr.name() == key_name)
                .ok_or_else(|| EntityError::UnknownKeyAttribute {
                    entity: name.to_string(),
                    attribute: key_name.to_string(),
                })?;
            unique_key.push(attr.clone());
        }

        Ok(Self {
            name,
            attributes,
            unique_key,
        })
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name() == name)
    }

    #[must_use]
    pub fn attribute_slice(&self) -> &[Attribute] {
        &self.attributes
    }

    #[must_use]
    pub fn key_slice(&self) -> &[Attribute] {
        &self.unique_key
    }
}

impl EntityMetadata for Entity {
    fn name(&self) -> &EntityName {
        &self.name
    }

    fn attributes(&self) -> Result<Vec<Attribute>, InternalError> {
        Ok(self.attributes.clone())
    }

    fn unique_key(&self) -> Result<Vec<Attribute>, InternalError> {
        Ok(self.unique_key.clone())
    }
}
