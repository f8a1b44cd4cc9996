//! Operation outcomes.
//!
//! Every resource operation returns an [`Outcome`]; the transport decides
//! how each variant maps onto its own status codes and headers.

use crate::{
    guard::GuardFailure, Conflict, Error, NextPage, RecordId, Timestamp, ValidationError,
};

/// Transport-agnostic response metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMeta {
    /// Current timestamp of the record or collection
    pub last_modified: Option<Timestamp>,
    /// Number of live records matching the list filters
    pub total_records: Option<usize>,
    /// Parameters of the following page, when there is one
    pub next_page: Option<NextPage>,
}

impl ResponseMeta {
    pub fn last_modified(timestamp: Timestamp) -> Self {
        Self {
            last_modified: Some(timestamp),
            ..Default::default()
        }
    }

    pub fn with_total_records(mut self, total: usize) -> Self {
        self.total_records = Some(total);
        self
    }
}

/// Result of a resource operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ok { body: T, meta: ResponseMeta },
    Created { body: T, meta: ResponseMeta },
    /// The caller's copy is current; no body.
    NotModified { last_modified: Timestamp },
    Invalid(Vec<ValidationError>),
    NotFound { record_id: RecordId },
    Conflict(Conflict),
    PreconditionFailed { last_modified: Timestamp, message: String },
    MethodNotAllowed,
    /// Storage failed; nothing was changed by this request.
    BackendFailure(String),
}

impl<T> Outcome<T> {
    /// Whether the operation produced a body.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Ok { .. } | Outcome::Created { .. })
    }

    pub fn body(&self) -> Option<&T> {
        match self {
            Outcome::Ok { body, .. } | Outcome::Created { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn into_body(self) -> Option<T> {
        match self {
            Outcome::Ok { body, .. } | Outcome::Created { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn meta(&self) -> Option<&ResponseMeta> {
        match self {
            Outcome::Ok { meta, .. } | Outcome::Created { meta, .. } => Some(meta),
            _ => None,
        }
    }

    /// The timestamp a transport should report, whatever the variant.
    pub fn last_modified(&self) -> Option<Timestamp> {
        match self {
            Outcome::Ok { meta, .. } | Outcome::Created { meta, .. } => meta.last_modified,
            Outcome::NotModified { last_modified }
            | Outcome::PreconditionFailed { last_modified, .. } => Some(*last_modified),
            _ => None,
        }
    }
}

/// Everything that ends an operation early.
///
/// Lets operation bodies use `?` and still land on an [`Outcome`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Halt {
    NotModified(Timestamp),
    Invalid(Vec<ValidationError>),
    NotFound(RecordId),
    Conflict(Conflict),
    PreconditionFailed(Timestamp, String),
    MethodNotAllowed,
    Backend(String),
}

impl From<ValidationError> for Halt {
    fn from(err: ValidationError) -> Self {
        Halt::Invalid(vec![err])
    }
}

impl From<Vec<ValidationError>> for Halt {
    fn from(errors: Vec<ValidationError>) -> Self {
        Halt::Invalid(errors)
    }
}

impl From<GuardFailure> for Halt {
    fn from(failure: GuardFailure) -> Self {
        match failure {
            GuardFailure::NotModified { timestamp } => Halt::NotModified(timestamp),
            GuardFailure::PreconditionFailed { timestamp, message } => {
                Halt::PreconditionFailed(timestamp, message)
            }
        }
    }
}

impl From<Error> for Halt {
    fn from(err: Error) -> Self {
        match Conflict::try_from(err) {
            Ok(conflict) => {
                tracing::warn!(field = %conflict.field, "unique field conflict");
                Halt::Conflict(conflict)
            }
            Err(Error::RecordNotFound(id)) => Halt::NotFound(id),
            Err(Error::Backend(msg)) => {
                tracing::error!(error = %msg, "storage backend failure");
                Halt::Backend(msg)
            }
            Err(other) => Halt::Invalid(vec![other.into()]),
        }
    }
}

impl Halt {
    pub(crate) fn into_outcome<T>(self) -> Outcome<T> {
        match self {
            Halt::NotModified(last_modified) => Outcome::NotModified { last_modified },
            Halt::Invalid(errors) => Outcome::Invalid(errors),
            Halt::NotFound(record_id) => Outcome::NotFound { record_id },
            Halt::Conflict(conflict) => Outcome::Conflict(conflict),
            Halt::PreconditionFailed(last_modified, message) => Outcome::PreconditionFailed {
                last_modified,
                message,
            },
            Halt::MethodNotAllowed => Outcome::MethodNotAllowed,
            Halt::Backend(msg) => Outcome::BackendFailure(msg),
        }
    }
}
