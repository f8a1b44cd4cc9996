//! Conditional requests: timestamp-based optimistic concurrency.

use crate::{Timestamp, ValidationError};

/// Header asking for a body only if the resource changed since a timestamp.
pub const IF_MODIFIED_SINCE: &str = "If-Modified-Since";
/// Header asking for a write only if the resource did not change since a
/// timestamp.
pub const IF_UNMODIFIED_SINCE: &str = "If-Unmodified-Since";

/// Message attached to a failed precondition.
pub const MODIFIED_MEANWHILE: &str = "Resource was modified meanwhile";

/// Why a guard stopped the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardFailure {
    /// The caller already has the current version.
    NotModified { timestamp: Timestamp },
    /// The resource changed after the caller's reference point.
    PreconditionFailed { timestamp: Timestamp, message: String },
}

/// The two optional conditional headers of a request, parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preconditions {
    pub if_modified_since: Option<Timestamp>,
    pub if_unmodified_since: Option<Timestamp>,
}

impl Preconditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modified_since(mut self, timestamp: Timestamp) -> Self {
        self.if_modified_since = Some(timestamp);
        self
    }

    pub fn unmodified_since(mut self, timestamp: Timestamp) -> Self {
        self.if_unmodified_since = Some(timestamp);
        self
    }

    /// Parse raw header values. Absent or blank headers disable the check.
    pub fn from_headers(
        if_modified_since: Option<&str>,
        if_unmodified_since: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            if_modified_since: parse_header(IF_MODIFIED_SINCE, if_modified_since)?,
            if_unmodified_since: parse_header(IF_UNMODIFIED_SINCE, if_unmodified_since)?,
        })
    }

    /// Stop with not-modified if the caller's timestamp is at least `current`.
    pub fn check_not_modified(&self, current: Timestamp) -> Result<(), GuardFailure> {
        match self.if_modified_since {
            Some(since) if current <= since => {
                Err(GuardFailure::NotModified { timestamp: current })
            }
            _ => Ok(()),
        }
    }

    /// Stop with precondition-failed if `current` is past the caller's
    /// timestamp.
    pub fn check_unmodified(&self, current: Timestamp) -> Result<(), GuardFailure> {
        match self.if_unmodified_since {
            Some(since) if current > since => Err(GuardFailure::PreconditionFailed {
                timestamp: current,
                message: MODIFIED_MEANWHILE.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

fn parse_header(name: &str, raw: Option<&str>) -> Result<Option<Timestamp>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            ValidationError::header(name, format!("{} should be an integer timestamp", name))
        }),
    }
}
