//! In-memory storage backend.
//!
//! Collections live in a concurrent map keyed by name. Deleted records stay
//! behind as tombstones so that clients syncing with `_since` can see
//! deletions.

use crate::{
    error::Result, filter::matches_all, sort::compare_records, CollectionName, CollectionSchema,
    Error, Filter, ListQuery, Record, RecordId, RecordSet, Storage, Timestamp, DELETED_FIELD,
};
use dashmap::DashMap;
use std::collections::HashMap;
use uuid::Uuid;

/// The records of one collection.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Live records and tombstones, by identifier
    records: HashMap<RecordId, Record>,
    /// Highest timestamp handed out
    timestamp: Timestamp,
}

impl Collection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a live record by ID.
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id).filter(|r| !r.is_deleted())
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Get all live (non-deleted) records.
    pub fn active_records(&self) -> impl Iterator<Item = &Record> {
        self.records.values().filter(|r| !r.is_deleted())
    }

    /// Get all records including tombstones.
    pub fn all_records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Count of live records.
    pub fn len(&self) -> usize {
        self.active_records().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hand out the next modification timestamp: the current time in
    /// milliseconds, bumped past the previous one if the clock lags.
    fn tick(&mut self) -> Timestamp {
        let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default();
        self.timestamp = now.max(self.timestamp + 1);
        self.timestamp
    }

    fn store(&mut self, mut record: Record) -> Record {
        let timestamp = self.tick();
        record.set_last_modified(timestamp);
        record.remove(DELETED_FIELD);
        if let Some(id) = record.id() {
            self.records.insert(id.to_string(), record.clone());
        }
        record
    }

    fn bury(&mut self, id: &str) -> Record {
        let timestamp = self.tick();
        let tombstone = Record::tombstone(id, timestamp);
        self.records.insert(id.to_string(), tombstone.clone());
        tombstone
    }

    fn check_unicity(
        &self,
        schema: &CollectionSchema,
        record: &Record,
        exclude: Option<&str>,
    ) -> Result<()> {
        for field in schema.unique_fields() {
            let Some(value) = record.get(field).filter(|v| !v.is_null()) else {
                continue;
            };

            let clash = self
                .active_records()
                .find(|other| other.id() != exclude && other.get(field) == Some(value));

            if let Some(existing) = clash {
                return Err(Error::Unicity {
                    field: field.to_string(),
                    existing: Box::new(existing.clone()),
                });
            }
        }
        Ok(())
    }
}

/// Thread-safe storage keeping every collection in memory.
///
/// Each collection sits behind its own shard guard, so a uniqueness check and
/// the write that follows it happen atomically.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    collections: DashMap<CollectionName, Collection>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every collection, tombstones included.
    pub fn flush(&self) {
        self.collections.clear();
    }

    /// Snapshot of a collection's state.
    pub fn collection(&self, name: &str) -> Option<Collection> {
        self.collections.get(name).map(|entry| entry.value().clone())
    }
}

impl Storage for MemoryStorage {
    fn collection_timestamp(&self, schema: &CollectionSchema) -> Result<Timestamp> {
        Ok(self
            .collections
            .get(&schema.name)
            .map_or(0, |entry| entry.value().timestamp()))
    }

    fn get_all(&self, schema: &CollectionSchema, query: &ListQuery) -> Result<RecordSet> {
        let Some(collection) = self.collections.get(&schema.name) else {
            return Ok(RecordSet::default());
        };

        let filtered: Vec<&Record> = collection
            .all_records()
            .filter(|r| query.include_deleted || !r.is_deleted())
            .filter(|r| matches_all(&query.filters, r))
            .collect();
        let total = filtered.iter().filter(|r| !r.is_deleted()).count();

        let mut page: Vec<&Record> = if query.pagination_rules.is_empty() {
            filtered
        } else {
            filtered
                .into_iter()
                .filter(|r| query.pagination_rules.iter().any(|rule| matches_all(rule, r)))
                .collect()
        };

        page.sort_by(|a, b| compare_records(a, b, &query.sorting));
        if let Some(limit) = query.limit {
            page.truncate(limit);
        }

        Ok(RecordSet {
            records: page.into_iter().cloned().collect(),
            total,
        })
    }

    fn get(&self, schema: &CollectionSchema, record_id: &str) -> Result<Record> {
        self.collections
            .get(&schema.name)
            .and_then(|entry| entry.value().get(record_id).cloned())
            .ok_or_else(|| Error::RecordNotFound(record_id.to_string()))
    }

    fn create(&self, schema: &CollectionSchema, mut record: Record) -> Result<Record> {
        let mut collection = self.collections.entry(schema.name.clone()).or_default();

        if record.id().is_none() {
            record.set_id(Uuid::new_v4().to_string());
        }
        collection.check_unicity(schema, &record, None)?;

        Ok(collection.store(record))
    }

    fn update(&self, schema: &CollectionSchema, record_id: &str, mut record: Record) -> Result<Record> {
        let mut collection = self.collections.entry(schema.name.clone()).or_default();

        record.set_id(record_id);
        collection.check_unicity(schema, &record, Some(record_id))?;

        Ok(collection.store(record))
    }

    fn delete(&self, schema: &CollectionSchema, record_id: &str) -> Result<Record> {
        let mut collection = self
            .collections
            .get_mut(&schema.name)
            .filter(|entry| entry.value().get(record_id).is_some())
            .ok_or_else(|| Error::RecordNotFound(record_id.to_string()))?;

        Ok(collection.bury(record_id))
    }

    fn delete_all(&self, schema: &CollectionSchema, filters: &[Filter]) -> Result<Vec<Record>> {
        let Some(mut collection) = self.collections.get_mut(&schema.name) else {
            return Ok(Vec::new());
        };

        let mut ids: Vec<RecordId> = collection
            .active_records()
            .filter(|r| matches_all(filters, r))
            .filter_map(|r| r.id().map(str::to_string))
            .collect();
        ids.sort();

        Ok(ids.iter().map(|id| collection.bury(id)).collect())
    }
}
