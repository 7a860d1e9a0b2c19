use crate::{
    dialect::DialectError,
    model::EntityError,
    transfer::{PatternError, RowError},
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Not a stable API; the facade crate maps it onto the public error.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct a metadata-origin internal error.
    ///
    /// Used by metadata providers when attribute or key resolution fails.
    pub fn metadata_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Metadata, message)
    }

    /// Construct a metadata-origin not-found error.
    pub fn metadata_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::NotFound, ErrorOrigin::Metadata, message)
    }

    /// Construct a generate-origin unsupported error.
    pub(crate) fn generate_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Generate, message)
    }

    /// Construct a generate-origin invariant violation.
    pub(crate) fn generate_invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvariantViolation, ErrorOrigin::Generate, message)
    }

    /// Construct a transfer-origin invariant violation.
    pub(crate) fn transfer_invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvariantViolation, ErrorOrigin::Transfer, message)
    }

    /// Construct an interface-origin internal error (sinks, producers).
    pub fn interface_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Interface, message)
    }

    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self.class, ErrorClass::Unsupported)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<EntityError> for InternalError {
    fn from(err: EntityError) -> Self {
        let class = match err {
            EntityError::DuplicateAttribute { .. } => ErrorClass::Conflict,
            EntityError::NoAttributes { .. } | EntityError::UnknownKeyAttribute { .. } => {
                ErrorClass::InvariantViolation
            }
        };

        Self::new(class, ErrorOrigin::Metadata, err.to_string())
    }
}

impl From<DialectError> for InternalError {
    fn from(err: DialectError) -> Self {
        Self::new(ErrorClass::NotFound, ErrorOrigin::Dialect, err.to_string())
    }
}

impl From<PatternError> for InternalError {
    fn from(err: PatternError) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Pattern, err.to_string())
    }
}

impl From<RowError> for InternalError {
    fn from(err: RowError) -> Self {
        Self::transfer_invariant(err.to_string())
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    NotFound,
    Internal,
    Conflict,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Internal => "internal",
            Self::Conflict => "conflict",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Metadata,
    Generate,
    Transfer,
    Pattern,
    Dialect,
    Interface,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Metadata => "metadata",
            Self::Generate => "generate",
            Self::Transfer => "transfer",
            Self::Pattern => "pattern",
            Self::Dialect => "dialect",
            Self::Interface => "interface",
        };
        write!(f, "{label}")
    }
}
