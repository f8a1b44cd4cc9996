//! Sort specifications.

use crate::{record::MODIFIED_FIELD, value::compare, CollectionSchema, FieldName, Record, ValidationError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Query parameter carrying the sort specification.
pub const SORT_PARAM: &str = "_sort";

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    Descending,
}

impl Direction {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// One key of a sort order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: FieldName,
    pub direction: Direction,
}

impl Sort {
    pub fn new(field: impl Into<FieldName>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<FieldName>) -> Self {
        Self::new(field, Direction::Ascending)
    }

    pub fn desc(field: impl Into<FieldName>) -> Self {
        Self::new(field, Direction::Descending)
    }
}

/// Compare two records by lexicographic priority of the sort keys.
pub fn compare_records(a: &Record, b: &Record, sorting: &[Sort]) -> Ordering {
    sorting
        .iter()
        .map(|sort| {
            let ordering = compare(a.value_of(&sort.field), b.value_of(&sort.field));
            sort.direction.apply(ordering)
        })
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

fn parse_key(key: &str) -> Option<(Direction, &str)> {
    let (direction, field) = match key.as_bytes().first() {
        Some(b'-') => (Direction::Descending, &key[1..]),
        Some(b'+') => (Direction::Ascending, &key[1..]),
        _ => (Direction::Ascending, key),
    };
    let is_word = !field.is_empty() && field.chars().all(|c| c.is_alphanumeric() || c == '_');
    is_word.then_some((direction, field))
}

/// Parse a comma separated sort specification such as `-size,name`.
///
/// Keys that are not of the form `[+-]?<field>` are ignored. The modification
/// timestamp is appended, descending, unless already present, so that every
/// order is total.
pub fn extract_sorting(
    specified: Option<&str>,
    schema: &CollectionSchema,
) -> Result<Vec<Sort>, ValidationError> {
    let mut sorting = Vec::new();

    for key in specified.unwrap_or_default().split(',') {
        let Some((direction, field)) = parse_key(key.trim()) else {
            continue;
        };

        if !schema.is_known(field) {
            return Err(ValidationError::querystring(
                SORT_PARAM,
                format!("Unknown sort field '{}'", field),
            ));
        }

        sorting.push(Sort::new(field, direction));
    }

    if !sorting.iter().any(|s| s.field == MODIFIED_FIELD) {
        sorting.push(Sort::desc(MODIFIED_FIELD));
    }

    Ok(sorting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldDef, FieldType};
    use serde_json::json;

    fn schema() -> CollectionSchema {
        CollectionSchema::new(
            "mushrooms",
            vec![
                FieldDef::required("name", FieldType::String),
                FieldDef::optional("size", FieldType::Int),
            ],
        )
    }

    #[test]
    fn absent_spec_sorts_by_recency() {
        let sorting = extract_sorting(None, &schema()).unwrap();
        assert_eq!(sorting, vec![Sort::desc("last_modified")]);
    }

    #[test]
    fn directions_and_tie_breaker() {
        let sorting = extract_sorting(Some("-size, +name"), &schema()).unwrap();
        assert_eq!(
            sorting,
            vec![
                Sort::desc("size"),
                Sort::asc("name"),
                Sort::desc("last_modified"),
            ]
        );
    }

    #[test]
    fn explicit_modification_sort_is_kept() {
        let sorting = extract_sorting(Some("-last_modified"), &schema()).unwrap();
        assert_eq!(sorting, vec![Sort::desc("last_modified")]);

        let sorting = extract_sorting(Some("last_modified,name"), &schema()).unwrap();
        assert_eq!(sorting, vec![Sort::asc("last_modified"), Sort::asc("name")]);
    }

    #[test]
    fn malformed_keys_are_ignored() {
        let sorting = extract_sorting(Some(",name,,-,+-size"), &schema()).unwrap();
        assert_eq!(sorting, vec![Sort::asc("name"), Sort::desc("last_modified")]);
    }

    #[test]
    fn unknown_field_rejected() {
        let err = extract_sorting(Some("name,-colour"), &schema()).unwrap_err();
        assert_eq!(err.name.as_deref(), Some("_sort"));
        assert_eq!(err.description, "Unknown sort field 'colour'");
    }

    #[test]
    fn records_compare_lexicographically() {
        let a = Record::from_value(json!({"size": 5, "name": "a", "last_modified": 1})).unwrap();
        let b = Record::from_value(json!({"size": 5, "name": "b", "last_modified": 2})).unwrap();
        let c = Record::from_value(json!({"size": 9, "name": "a", "last_modified": 3})).unwrap();

        let sorting = vec![Sort::desc("size"), Sort::asc("name")];
        assert_eq!(compare_records(&c, &a, &sorting), Ordering::Less);
        assert_eq!(compare_records(&a, &b, &sorting), Ordering::Less);
        assert_eq!(compare_records(&a, &a, &sorting), Ordering::Equal);
    }
}
