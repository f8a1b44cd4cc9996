//! Schema definition and validation.
//!
//! Schemas declare the fields of a collection, which of them are read-only
//! or unique, and validate candidate records before they reach storage.
//! The reserved `id` and `last_modified` fields are implicit in every
//! collection.

use crate::{
    error::Result, CollectionName, Error, FieldName, Record, ValidationError,
    ID_FIELD, MODIFIED_FIELD,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Field types supported in schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Int,
    Float,
    Bool,
    Timestamp,
    /// Arbitrary nested JSON
    Json,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::String => write!(f, "String"),
            FieldType::Int => write!(f, "Int"),
            FieldType::Float => write!(f, "Float"),
            FieldType::Bool => write!(f, "Bool"),
            FieldType::Timestamp => write!(f, "Timestamp"),
            FieldType::Json => write!(f, "Json"),
        }
    }
}

/// Definition of a field in a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    /// Field name
    pub name: FieldName,
    /// Field type
    pub field_type: FieldType,
    /// Whether this field is required
    pub required: bool,
    /// Whether this field can no longer change once the record exists
    #[serde(default)]
    pub read_only: bool,
    /// Whether values must be unique across the collection
    #[serde(default)]
    pub unique: bool,
}

impl FieldDef {
    /// Create a new required field definition.
    pub fn required(name: impl Into<FieldName>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            read_only: false,
            unique: false,
        }
    }

    /// Create a new optional field definition.
    pub fn optional(name: impl Into<FieldName>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            read_only: false,
            unique: false,
        }
    }

    /// Mark the field as read-only.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Mark the field as unique within its collection.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Validate a JSON value against this field definition.
    pub fn validate(&self, value: Option<&Value>) -> Result<()> {
        match value {
            None if self.required => Err(Error::MissingRequiredField(self.name.clone())),
            None => Ok(()),
            Some(Value::Null) if self.required => {
                Err(Error::MissingRequiredField(self.name.clone()))
            }
            Some(Value::Null) => Ok(()),
            Some(v) => self.validate_type(v),
        }
    }

    fn validate_type(&self, value: &Value) -> Result<()> {
        let valid = match self.field_type {
            FieldType::String => value.is_string(),
            FieldType::Int => value.is_i64() || value.is_u64(),
            FieldType::Float => value.is_f64() || value.is_i64() || value.is_u64(),
            FieldType::Bool => value.is_boolean(),
            FieldType::Timestamp => value.is_u64() || value.is_i64(),
            FieldType::Json => true, // Any JSON is valid
        };

        if valid {
            Ok(())
        } else {
            Err(Error::TypeMismatch {
                field: self.name.clone(),
                expected: self.field_type.to_string(),
                got: json_type_name(value).to_string(),
            })
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "Null",
        Value::Bool(_) => "Bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "Int",
        Value::Number(_) => "Float",
        Value::String(_) => "String",
        Value::Array(_) => "Array",
        Value::Object(_) => "Object",
    }
}

/// Schema for a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSchema {
    /// Collection name
    pub name: CollectionName,
    /// Field definitions, excluding the reserved ones
    pub fields: Vec<FieldDef>,
}

impl CollectionSchema {
    /// Create a new collection schema.
    pub fn new(name: impl Into<CollectionName>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// All field names usable in filters and sorts, reserved ones first.
    pub fn known_fields(&self) -> impl Iterator<Item = &str> {
        [ID_FIELD, MODIFIED_FIELD]
            .into_iter()
            .chain(self.fields.iter().map(|f| f.name.as_str()))
    }

    pub fn is_known(&self, field: &str) -> bool {
        self.known_fields().any(|known| known == field)
    }

    pub fn is_readonly(&self, field: &str) -> bool {
        field == ID_FIELD
            || field == MODIFIED_FIELD
            || self.field(field).is_some_and(|f| f.read_only)
    }

    /// Fields whose values must not clash between two live records.
    ///
    /// The identifier is always unique.
    pub fn unique_fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(ID_FIELD).chain(
            self.fields
                .iter()
                .filter(|f| f.unique)
                .map(|f| f.name.as_str()),
        )
    }

    /// Validate a record against this schema.
    ///
    /// Returns the record restricted to known fields, or every field-level
    /// error found. The modification timestamp is carried through without
    /// checks since storage overwrites it.
    pub fn validate(&self, payload: &Record) -> std::result::Result<Record, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut validated = Record::new();

        if let Some(id) = payload.get(ID_FIELD) {
            match id {
                Value::String(_) => {
                    validated.insert(ID_FIELD, id.clone());
                }
                other => errors.push(ValidationError::from(Error::TypeMismatch {
                    field: ID_FIELD.into(),
                    expected: FieldType::String.to_string(),
                    got: json_type_name(other).to_string(),
                })),
            }
        }

        if let Some(timestamp) = payload.get(MODIFIED_FIELD) {
            validated.insert(MODIFIED_FIELD, timestamp.clone());
        }

        for field in &self.fields {
            let value = payload.get(&field.name);
            match field.validate(value) {
                Ok(()) => {
                    if let Some(value) = value {
                        validated.insert(field.name.clone(), value.clone());
                    }
                }
                Err(err) => errors.push(err.into()),
            }
        }

        if errors.is_empty() {
            Ok(validated)
        } else {
            Err(errors)
        }
    }
}

/// The set of collections served together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Collection schemas by name
    pub collections: HashMap<CollectionName, CollectionSchema>,
}

impl Schema {
    /// Create a new schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collection to the schema.
    pub fn add_collection(&mut self, collection: CollectionSchema) -> &mut Self {
        self.collections.insert(collection.name.clone(), collection);
        self
    }

    /// Builder-style method to add a collection.
    pub fn with_collection(mut self, collection: CollectionSchema) -> Self {
        self.add_collection(collection);
        self
    }

    /// Get a collection schema by name.
    pub fn get_collection(&self, name: &str) -> Option<&CollectionSchema> {
        self.collections.get(name)
    }
}
