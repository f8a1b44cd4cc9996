//! Filters extracted from query string parameters.

use crate::{
    record::MODIFIED_FIELD,
    value::{compare, is_integer, native_value},
    CollectionSchema, FieldName, Record, ValidationError,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Query parameter opening the modification window.
pub const SINCE_PARAM: &str = "_since";
/// Query parameter closing the modification window.
pub const TO_PARAM: &str = "_to";

/// Comparison operator of a filter.
///
/// `Min` and `Max` are inclusive bounds, `Lt` and `Gt` exclusive ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Eq,
    Not,
    Lt,
    Gt,
    Min,
    Max,
}

impl Comparison {
    /// Operator for a `<prefix>_<field>` query parameter.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "min" => Some(Comparison::Min),
            "max" => Some(Comparison::Max),
            "not" => Some(Comparison::Not),
            "lt" => Some(Comparison::Lt),
            "gt" => Some(Comparison::Gt),
            _ => None,
        }
    }

    /// Whether `left <op> right` holds, given `left.cmp(right)`.
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Comparison::Eq => ordering == Ordering::Equal,
            Comparison::Not => ordering != Ordering::Equal,
            Comparison::Lt => ordering == Ordering::Less,
            Comparison::Gt => ordering == Ordering::Greater,
            Comparison::Min => ordering != Ordering::Less,
            Comparison::Max => ordering != Ordering::Greater,
        }
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Comparison::Eq => write!(f, "eq"),
            Comparison::Not => write!(f, "not"),
            Comparison::Lt => write!(f, "lt"),
            Comparison::Gt => write!(f, "gt"),
            Comparison::Min => write!(f, "min"),
            Comparison::Max => write!(f, "max"),
        }
    }
}

/// A single predicate on one field. Filters combine by logical AND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: FieldName,
    pub value: Value,
    pub operator: Comparison,
}

impl Filter {
    pub fn new(field: impl Into<FieldName>, value: impl Into<Value>, operator: Comparison) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            operator,
        }
    }

    pub fn eq(field: impl Into<FieldName>, value: impl Into<Value>) -> Self {
        Self::new(field, value, Comparison::Eq)
    }

    pub fn lt(field: impl Into<FieldName>, value: impl Into<Value>) -> Self {
        Self::new(field, value, Comparison::Lt)
    }

    pub fn gt(field: impl Into<FieldName>, value: impl Into<Value>) -> Self {
        Self::new(field, value, Comparison::Gt)
    }

    /// Evaluate the filter against a record. Missing fields read as `null`.
    pub fn matches(&self, record: &Record) -> bool {
        let ordering = compare(record.value_of(&self.field), &self.value);
        self.operator.accepts(ordering)
    }
}

/// Whether a record satisfies every filter.
pub fn matches_all(filters: &[Filter], record: &Record) -> bool {
    filters.iter().all(|f| f.matches(record))
}

fn is_word(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn split_operator(param: &str) -> (Comparison, &str) {
    if let Some((prefix, field)) = param.split_once('_') {
        if let Some(operator) = Comparison::from_prefix(prefix) {
            if is_word(field) {
                return (operator, field);
            }
        }
    }
    (Comparison::Eq, param)
}

/// Parse query string pairs into filters.
///
/// Parameters starting with `_` are reserved and skipped, except `_since`
/// and `_to` which bound the modification timestamp.
pub fn extract_filters<K, V>(
    params: &[(K, V)],
    schema: &CollectionSchema,
) -> Result<Vec<Filter>, ValidationError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut filters = Vec::new();

    for (param, raw) in params {
        let param = param.as_ref().trim();
        let value = native_value(raw.as_ref());

        if param == SINCE_PARAM || param == TO_PARAM {
            if !is_integer(&value) {
                return Err(ValidationError::querystring(
                    param,
                    format!("Invalid value for {}", param),
                ));
            }
            let operator = if param == SINCE_PARAM {
                Comparison::Gt
            } else {
                Comparison::Lt
            };
            filters.push(Filter::new(MODIFIED_FIELD, value, operator));
            continue;
        }

        if param.starts_with('_') {
            continue;
        }

        let (operator, field) = split_operator(param);
        if !schema.is_known(field) {
            return Err(ValidationError::querystring(
                param,
                format!("Unknown filter field '{}'", param),
            ));
        }

        filters.push(Filter::new(field, value, operator));
    }

    Ok(filters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldDef, FieldType, Location};
    use serde_json::json;

    fn schema() -> CollectionSchema {
        CollectionSchema::new(
            "mushrooms",
            vec![
                FieldDef::required("name", FieldType::String),
                FieldDef::optional("size", FieldType::Int),
                FieldDef::optional("edible", FieldType::Bool),
            ],
        )
    }

    fn extract(params: &[(&str, &str)]) -> Result<Vec<Filter>, ValidationError> {
        extract_filters(params, &schema())
    }

    #[test]
    fn equality_by_default() {
        let filters = extract(&[("name", "Morel")]).unwrap();
        assert_eq!(filters, vec![Filter::eq("name", "Morel")]);
    }

    #[test]
    fn prefixed_operators() {
        let filters = extract(&[
            ("min_size", "2"),
            ("max_size", "10"),
            ("not_name", "Amanita"),
            ("lt_size", "8"),
            ("gt_size", "3"),
        ])
        .unwrap();

        assert_eq!(
            filters,
            vec![
                Filter::new("size", 2, Comparison::Min),
                Filter::new("size", 10, Comparison::Max),
                Filter::new("name", "Amanita", Comparison::Not),
                Filter::new("size", 8, Comparison::Lt),
                Filter::new("size", 3, Comparison::Gt),
            ]
        );
    }

    #[test]
    fn values_are_coerced() {
        let filters = extract(&[("edible", "true"), ("size", "4")]).unwrap();
        assert_eq!(filters[0].value, json!(true));
        assert_eq!(filters[1].value, json!(4));
    }

    #[test]
    fn since_and_to_bound_modification_time() {
        let filters = extract(&[("_since", "100"), ("_to", "200")]).unwrap();
        assert_eq!(
            filters,
            vec![
                Filter::gt(MODIFIED_FIELD, 100),
                Filter::lt(MODIFIED_FIELD, 200),
            ]
        );
    }

    #[test]
    fn since_must_be_integer() {
        let err = extract(&[("_since", "yesterday")]).unwrap_err();
        assert_eq!(err.location, Location::Querystring);
        assert_eq!(err.name.as_deref(), Some("_since"));
        assert_eq!(err.description, "Invalid value for _since");

        assert!(extract(&[("_to", "1.5")]).is_err());
    }

    #[test]
    fn reserved_parameters_are_skipped() {
        let filters = extract(&[("_sort", "name"), ("_limit", "2"), ("_token", "x")]).unwrap();
        assert!(filters.is_empty());
    }

    #[test]
    fn unknown_field_rejected() {
        let err = extract(&[("colour", "red")]).unwrap_err();
        assert_eq!(err.name.as_deref(), Some("colour"));
        assert_eq!(err.description, "Unknown filter field 'colour'");

        let err = extract(&[("min_colour", "red")]).unwrap_err();
        assert_eq!(err.name.as_deref(), Some("min_colour"));
    }

    #[test]
    fn reserved_fields_are_filterable() {
        let filters = extract(&[("id", "abc"), ("gt_last_modified", "5")]).unwrap();
        assert_eq!(filters[0], Filter::eq("id", "abc"));
        assert_eq!(filters[1], Filter::gt("last_modified", 5));
    }

    #[test]
    fn filter_matching() {
        let record = Record::from_value(json!({"name": "Morel", "size": 5})).unwrap();

        assert!(Filter::eq("name", "Morel").matches(&record));
        assert!(Filter::new("size", 5, Comparison::Min).matches(&record));
        assert!(Filter::new("size", 5, Comparison::Max).matches(&record));
        assert!(!Filter::lt("size", 5).matches(&record));
        assert!(Filter::gt("size", 4).matches(&record));
        assert!(Filter::new("name", "Cep", Comparison::Not).matches(&record));
        assert!(Filter::eq("edible", Value::Null).matches(&record));
    }
}
