//! Storage backend contract.
//!
//! The engine never persists anything itself. A backend receives the schema
//! of the collection it is asked about, so a single backend can hold several
//! collections and enforce their unique fields.

use crate::{error::Result, CollectionSchema, Filter, PaginationRules, Record, Sort, Timestamp};

/// Parameters of a collection listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    /// Conjunction every returned record must satisfy
    pub filters: Vec<Filter>,
    /// Sort order, most significant key first
    pub sorting: Vec<Sort>,
    /// Disjunction of conjunctions; empty means no cursor
    pub pagination_rules: PaginationRules,
    /// Maximum number of records to return
    pub limit: Option<usize>,
    /// Whether tombstones are returned
    pub include_deleted: bool,
}

/// A page of records and the number of live records matching the filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    pub records: Vec<Record>,
    pub total: usize,
}

/// Operations a backend must provide.
///
/// Each call is atomic from the engine's point of view. Writes assign the
/// identifier (when absent) and a modification timestamp strictly greater
/// than any previous one in the collection.
pub trait Storage: Send + Sync {
    /// Highest modification timestamp in the collection, `0` when nothing
    /// was ever written.
    fn collection_timestamp(&self, schema: &CollectionSchema) -> Result<Timestamp>;

    /// List records. `total` counts live records matching `filters`,
    /// regardless of pagination rules and limit.
    fn get_all(&self, schema: &CollectionSchema, query: &ListQuery) -> Result<RecordSet>;

    /// Fetch a live record, or fail with [`crate::Error::RecordNotFound`].
    fn get(&self, schema: &CollectionSchema, record_id: &str) -> Result<Record>;

    /// Store a new record, or fail with [`crate::Error::Unicity`].
    fn create(&self, schema: &CollectionSchema, record: Record) -> Result<Record>;

    /// Replace (or create) the record with this identifier, or fail with
    /// [`crate::Error::Unicity`].
    fn update(&self, schema: &CollectionSchema, record_id: &str, record: Record) -> Result<Record>;

    /// Delete a live record and return its tombstone.
    fn delete(&self, schema: &CollectionSchema, record_id: &str) -> Result<Record>;

    /// Delete every live record matching `filters` and return the tombstones.
    fn delete_all(&self, schema: &CollectionSchema, filters: &[Filter]) -> Result<Vec<Record>>;
}
