use dbkit_core::{
    error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError},
    transfer::PatternError,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        let kind = match err.class {
            ErrorClass::NotFound => ErrorKind::NotFound,
            ErrorClass::Conflict => ErrorKind::Conflict,
            ErrorClass::Unsupported => ErrorKind::Unsupported,
            ErrorClass::InvariantViolation => ErrorKind::Invalid,
            ErrorClass::Internal => ErrorKind::Internal,
        };

        Self::new(kind, err.origin.into(), err.message)
    }
}

impl From<PatternError> for Error {
    fn from(err: PatternError) -> Self {
        InternalError::from(err).into()
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers and tooling.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Named entity, attribute, or dialect does not exist.
    NotFound,

    /// Metadata contradicts itself (duplicate attribute names).
    Conflict,

    /// The request is well-formed but not supported here.
    Unsupported,

    /// Input violates a documented shape (row length, key subset).
    Invalid,

    /// The caller cannot remediate this.
    Internal,
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Metadata,
    Generate,
    Transfer,
    Pattern,
    Dialect,
    Interface,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Metadata => Self::Metadata,
            CoreErrorOrigin::Generate => Self::Generate,
            CoreErrorOrigin::Transfer => Self::Transfer,
            CoreErrorOrigin::Pattern => Self::Pattern,
            CoreErrorOrigin::Dialect => Self::Dialect,
            CoreErrorOrigin::Interface => Self::Interface,
        }
    }
}
