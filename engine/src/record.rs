//! Record types for storing data.

use crate::{error::Result, Error, RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the identifier field.
pub const ID_FIELD: &str = "id";
/// Name of the modification timestamp field.
pub const MODIFIED_FIELD: &str = "last_modified";
/// Name of the tombstone marker field.
pub const DELETED_FIELD: &str = "deleted";

static NULL: Value = Value::Null;

/// A flat mapping from field name to value.
///
/// The engine only looks at the reserved fields and at whatever fields a
/// filter or sort refers to; everything else is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a record from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(Error::InvalidPayload("payload must be an object".into())),
        }
    }

    /// Build the residual representation of a deleted record.
    pub fn tombstone(id: impl Into<RecordId>, timestamp: Timestamp) -> Self {
        let mut record = Self::new();
        record.insert(ID_FIELD, id.into());
        record.insert(MODIFIED_FIELD, timestamp);
        record.insert(DELETED_FIELD, true);
        record
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    pub fn set_id(&mut self, id: impl Into<RecordId>) {
        self.insert(ID_FIELD, id.into());
    }

    pub fn last_modified(&self) -> Option<Timestamp> {
        self.0.get(MODIFIED_FIELD).and_then(Value::as_u64)
    }

    pub fn set_last_modified(&mut self, timestamp: Timestamp) {
        self.insert(MODIFIED_FIELD, timestamp);
    }

    /// Whether this is a tombstone.
    pub fn is_deleted(&self) -> bool {
        matches!(self.0.get(DELETED_FIELD), Some(Value::Bool(true)))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Value of a field, with missing fields reading as `null`.
    pub fn value_of(&self, field: &str) -> &Value {
        self.0.get(field).unwrap_or(&NULL)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Record {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
