//! Translation of storage uniqueness violations into conflicts.

use crate::{Error, FieldName, Record};
use serde::Serialize;
use std::fmt;

/// A unique field clash with an existing record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    /// The field whose value is already taken
    pub field: FieldName,
    /// The record holding that value
    pub existing: Record,
}

impl Conflict {
    pub fn new(field: impl Into<FieldName>, existing: Record) -> Self {
        Self {
            field: field.into(),
            existing,
        }
    }

    pub fn message(&self) -> String {
        let existing = match self.existing.get(crate::ID_FIELD) {
            Some(serde_json::Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
            None => "unknown".to_string(),
        };
        format!("Conflict of field {} on record {}", self.field, existing)
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Only [`Error::Unicity`] translates; any other error is handed back.
impl TryFrom<Error> for Conflict {
    type Error = Error;

    fn try_from(err: Error) -> Result<Self, Error> {
        match err {
            Error::Unicity { field, existing } => Ok(Conflict::new(field, *existing)),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn translates_unicity_error() {
        let existing = Record::from_value(json!({"id": "abc", "city": "Paris"})).unwrap();
        let err = Error::Unicity {
            field: "city".into(),
            existing: Box::new(existing.clone()),
        };

        let conflict = Conflict::try_from(err).unwrap();
        assert_eq!(conflict.field, "city");
        assert_eq!(conflict.existing, existing);
        assert_eq!(conflict.message(), "Conflict of field city on record abc");
    }

    #[test]
    fn other_errors_pass_through() {
        let err = Error::RecordNotFound("abc".into());
        assert_eq!(Conflict::try_from(err.clone()), Err(err));
    }

    #[test]
    fn non_string_identifier_in_message() {
        let conflict = Conflict::new("city", Record::from_value(json!({"id": 42})).unwrap());
        assert_eq!(conflict.to_string(), "Conflict of field city on record 42");
    }

    #[test]
    fn serializes_structured_record() {
        let conflict = Conflict::new("city", Record::from_value(json!({"id": 42})).unwrap());
        let json = serde_json::to_value(&conflict).unwrap();
        assert_eq!(json, json!({"field": "city", "existing": {"id": 42}}));
    }
}
