use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// DataKind
///
/// Coarse data classification of an attribute.
/// Drives placeholder literals, string quoting, and datetime coercion.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    #[display("BOOLEAN")]
    Boolean,
    #[display("NUMERIC")]
    Numeric,
    #[display("STRING")]
    String,
    #[display("DATETIME")]
    Datetime,
    #[display("BINARY")]
    Binary,
    #[display("CONTENT")]
    Content,
    #[display("ARRAY")]
    Array,
    #[display("OBJECT")]
    Object,
    #[display("UNKNOWN")]
    Unknown,
}

impl DataKind {
    /// Placeholder literal emitted when no concrete value is available.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Boolean => "false",
            Self::Numeric => "0",
            Self::String | Self::Datetime => "''",
            Self::Binary | Self::Content | Self::Array | Self::Object | Self::Unknown => "?",
        }
    }
}

///
/// Attribute
/// One column of an entity, as captured by a schema snapshot.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Attribute {
    name: String,
    ordinal: usize,
    data_kind: DataKind,
    default_value: Option<String>,
    unique_key: bool,
}

impl Attribute {
    #[must_use]
    pub fn new(name: impl Into<String>, ordinal: usize, data_kind: DataKind) -> Self {
        Self {
            name: name.into(),
            ordinal,
            data_kind,
            default_value: None,
            unique_key: false,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Mark this attribute as part of the entity's unique key.
    #[must_use]
    pub const fn in_unique_key(mut self) -> Self {
        self.unique_key = true;
        self
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

    /// Schema default, if the attribute declares a non-empty one.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref().filter(|v| !v.is_empty())
    }

    #[must_use]
    pub const fn is_unique_key(&self) -> bool {
        self.unique_key
    }
}
