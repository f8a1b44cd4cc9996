//! Opaque continuation tokens for cursor pagination.
//!
//! A token is the URL-safe base64 encoding of a JSON object holding, for each
//! sort field, the value it had on the last record of the previous page. Keys
//! appear in sort order and floats decode to the exact same bits.

use crate::{error::TokenError, Record, Sort};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::{Map, Value};

/// Decoded pagination token. Values are kept in sort order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationToken {
    values: Map<String, Value>,
}

impl PaginationToken {
    /// Capture the sort field values of `record`.
    pub fn from_record(sorting: &[Sort], record: &Record) -> Self {
        let values = sorting
            .iter()
            .map(|sort| (sort.field.clone(), record.value_of(&sort.field).clone()))
            .collect();
        Self { values }
    }

    /// Value captured for a sort field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn encode(&self) -> String {
        let json = Value::Object(self.values.clone()).to_string();
        URL_SAFE_NO_PAD.encode(json.as_bytes())
    }

    pub fn decode(token: &str) -> Result<Self, TokenError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim().trim_end_matches('='))
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        let value: Value =
            serde_json::from_slice(&bytes).map_err(|e| TokenError::Json(e.to_string()))?;

        match value {
            Value::Object(values) => Ok(Self { values }),
            _ => Err(TokenError::NotAnObject),
        }
    }
}
