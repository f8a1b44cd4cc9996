//! Error types for the shelf engine.

use crate::{FieldName, Record, RecordId};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// All possible errors from the engine and its storage backends.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    // Validation errors
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("missing required field: {0}")]
    MissingRequiredField(FieldName),

    #[error("type mismatch for field '{field}': expected {expected}, got {got}")]
    TypeMismatch {
        field: FieldName,
        expected: String,
        got: String,
    },

    // Storage errors
    #[error("record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("unique constraint violated on field '{field}'")]
    Unicity {
        field: FieldName,
        existing: Box<Record>,
    },

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type for engine and storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to decode a pagination token.
///
/// Kept apart from [`Error`] so callers can report a querystring problem
/// instead of a server failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not valid base64: {0}")]
    Encoding(String),

    #[error("token is not valid JSON: {0}")]
    Json(String),

    #[error("token does not decode to an object")]
    NotAnObject,

    #[error("token has no value for sort field '{0}'")]
    MissingField(FieldName),
}

/// Where an invalid value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Querystring,
    Body,
    Header,
    Path,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Querystring => write!(f, "querystring"),
            Location::Body => write!(f, "body"),
            Location::Header => write!(f, "header"),
            Location::Path => write!(f, "path"),
        }
    }
}

/// A field-attributed validation failure, surfaced to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub location: Location,
    pub name: Option<String>,
    pub description: String,
}

impl ValidationError {
    pub fn new(location: Location, name: Option<String>, description: impl Into<String>) -> Self {
        Self {
            location,
            name,
            description: description.into(),
        }
    }

    /// Error on a query string parameter.
    pub fn querystring(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Location::Querystring, Some(name.into()), description)
    }

    /// Error on a body field.
    pub fn body(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Location::Body, Some(name.into()), description)
    }

    /// Error on a request header.
    pub fn header(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Location::Header, Some(name.into()), description)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} in {}: {}", name, self.location, self.description),
            None => write!(f, "{}: {}", self.location, self.description),
        }
    }
}

impl From<Error> for ValidationError {
    fn from(err: Error) -> Self {
        match err {
            Error::MissingRequiredField(field) => {
                let description = format!("{} is missing", field);
                ValidationError::body(field, description)
            }
            Error::TypeMismatch { ref field, .. } => ValidationError::body(field.clone(), err.to_string()),
            Error::InvalidPayload(msg) => ValidationError::new(Location::Body, None, msg),
            other => ValidationError::new(Location::Body, None, other.to_string()),
        }
    }
}
