use alloc::{format, string::String};

use thiserror::Error;

use crate::location::SourceLocation;

/// Id reported when a producer announces a container larger than the
/// destination can represent.
pub const EXCESSIVE_SIZE_ID: u16 = 408;

/// The category of an [`Error`].
///
/// Producers pick the category when they construct an error; the numeric id
/// only refines it. [`ErrorKind::from_id`] recovers the category of a raw id
/// from its hundreds digit.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input (ids 1xx).
    #[error("parse_error")]
    Parse,
    /// Invalid traversal (ids 2xx).
    #[error("invalid_iterator")]
    InvalidIterator,
    /// Type mismatch (ids 3xx).
    #[error("type_error")]
    Type,
    /// Out of range or resource limit (ids 4xx).
    #[error("out_of_range")]
    OutOfRange,
    /// Anything else (ids 5xx).
    #[error("other_error")]
    Other,
}

impl ErrorKind {
    /// Classifies a raw error id by its category digit.
    ///
    /// Returns `None` for ids outside the five known categories.
    ///
    /// ```
    /// use jsonsink::ErrorKind;
    ///
    /// assert_eq!(ErrorKind::from_id(101), Some(ErrorKind::Parse));
    /// assert_eq!(ErrorKind::from_id(408), Some(ErrorKind::OutOfRange));
    /// assert_eq!(ErrorKind::from_id(999), None);
    /// ```
    #[must_use]
    pub const fn from_id(id: u16) -> Option<Self> {
        match (id / 100) % 100 {
            1 => Some(Self::Parse),
            2 => Some(Self::InvalidIterator),
            3 => Some(Self::Type),
            4 => Some(Self::OutOfRange),
            5 => Some(Self::Other),
            _ => None,
        }
    }
}

/// A structured error reported by a producer or raised by a builder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[json.exception.{kind}.{id}] {message}")]
pub struct Error {
    kind: ErrorKind,
    id: u16,
    message: String,
    location: SourceLocation,
}

impl Error {
    /// Creates an error of an explicit category.
    pub fn new(
        kind: ErrorKind,
        id: u16,
        message: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        debug_assert!(
            ErrorKind::from_id(id).is_none_or(|k| k == kind),
            "error id {id} does not belong to category {kind}"
        );
        Self {
            kind,
            id,
            message: message.into(),
            location,
        }
    }

    /// Creates an error whose category is taken from `id`.
    ///
    /// Returns `None` when `id` does not fall in a known category.
    pub fn from_id(id: u16, message: impl Into<String>, location: SourceLocation) -> Option<Self> {
        ErrorKind::from_id(id).map(|kind| Self::new(kind, id, message, location))
    }

    /// A malformed-input error.
    pub fn parse_error(id: u16, message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(ErrorKind::Parse, id, message, location)
    }

    /// An invalid-traversal error.
    pub fn invalid_iterator(id: u16, message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(ErrorKind::InvalidIterator, id, message, location)
    }

    /// A type-mismatch error.
    pub fn type_error(id: u16, message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(ErrorKind::Type, id, message, location)
    }

    /// An out-of-range or resource-limit error.
    pub fn out_of_range(id: u16, message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(ErrorKind::OutOfRange, id, message, location)
    }

    /// Any other error.
    pub fn other(id: u16, message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(ErrorKind::Other, id, message, location)
    }

    pub(crate) fn excessive_size(container: &str, len: usize, location: SourceLocation) -> Self {
        Self::out_of_range(
            EXCESSIVE_SIZE_ID,
            format!("excessive {container} size: {len}"),
            location,
        )
    }

    /// The error's category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The numeric id, e.g. `101` or `408`.
    #[must_use]
    pub fn id(&self) -> u16 {
        self.id
    }

    /// The human-readable message, without the category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Where the error was detected.
    #[must_use]
    pub fn location(&self) -> SourceLocation {
        self.location
    }
}

/// What a builder does when a parse fails.
///
/// # Default
///
/// [`ErrorPolicy::Raise`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Return the error as `Err` from the failing sink method.
    #[default]
    Raise,
    /// Flag the builder as errored and return `Ok(false)`.
    Record,
}

impl ErrorPolicy {
    /// Applies the policy to `error`, yielding the sink method's result.
    ///
    /// # Errors
    ///
    /// Returns `error` unchanged under [`ErrorPolicy::Raise`].
    pub fn apply(self, error: &Error) -> Result<bool, Error> {
        match self {
            Self::Raise => Err(error.clone()),
            Self::Record => Ok(false),
        }
    }
}
