//! The resource orchestrator.
//!
//! A [`Resource`] binds a collection schema to a storage backend and exposes
//! the six CRUD operations. It sequences query parsing, conditional request
//! checks, validation and storage calls, and shapes each result into an
//! [`Outcome`]. It holds no mutable state, so one instance serves any number
//! of concurrent requests.

use crate::{
    extract_filters, extract_pagination, extract_sorting,
    guard::Preconditions,
    outcome::Halt,
    sort::SORT_PARAM,
    CollectionSchema, Error, ListQuery, NextPage, Outcome, PaginationToken, Record, RecordSet,
    ResponseMeta, Storage, Timestamp, ValidationError, ID_FIELD, MODIFIED_FIELD,
};
use serde_json::Value;
use std::sync::Arc;

/// Static configuration of a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    /// Page size used when the request has no `_limit`
    pub paginate_by: Option<usize>,
    /// Whether deleting the whole collection is allowed
    pub delete_collection_enabled: bool,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            paginate_by: None,
            delete_collection_enabled: true,
        }
    }
}

/// Hook applied to every candidate record right before it is written.
pub trait RecordProcessor: Send + Sync {
    /// Post-process `new`; `old` is the stored version, if any.
    fn process(&self, new: Record, old: Option<&Record>) -> Result<Record, Vec<ValidationError>>;
}

struct Passthrough;

impl RecordProcessor for Passthrough {
    fn process(&self, new: Record, _old: Option<&Record>) -> Result<Record, Vec<ValidationError>> {
        Ok(new)
    }
}

impl<F> RecordProcessor for F
where
    F: Fn(Record, Option<&Record>) -> Result<Record, Vec<ValidationError>> + Send + Sync,
{
    fn process(&self, new: Record, old: Option<&Record>) -> Result<Record, Vec<ValidationError>> {
        self(new, old)
    }
}

/// What the transport extracted from a request, besides path and body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    /// Query string pairs, in request order
    pub query: Vec<(String, String)>,
    /// Conditional headers
    pub preconditions: Preconditions,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn with_preconditions(mut self, preconditions: Preconditions) -> Self {
        self.preconditions = preconditions;
        self
    }

    /// Last value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .rev()
            .find(|(key, _)| key.trim() == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A collection exposed through CRUD operations.
pub struct Resource<S> {
    schema: CollectionSchema,
    storage: Arc<S>,
    config: ResourceConfig,
    processor: Arc<dyn RecordProcessor>,
}

impl<S> std::fmt::Debug for Resource<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("schema", &self.schema)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: Storage> Resource<S> {
    pub fn new(schema: CollectionSchema, storage: Arc<S>, config: ResourceConfig) -> Self {
        Self {
            schema,
            storage,
            config,
            processor: Arc::new(Passthrough),
        }
    }

    /// Install a hook run on every record about to be written.
    pub fn with_processor(mut self, processor: impl RecordProcessor + 'static) -> Self {
        self.processor = Arc::new(processor);
        self
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn schema(&self) -> &CollectionSchema {
        &self.schema
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// List the collection, filtered, sorted and paginated.
    pub fn list(&self, ctx: &RequestContext) -> Outcome<Vec<Record>> {
        self.try_list(ctx).unwrap_or_else(Halt::into_outcome)
    }

    /// Create a record.
    pub fn create(&self, ctx: &RequestContext, payload: Record) -> Outcome<Record> {
        self.try_create(ctx, payload)
            .unwrap_or_else(Halt::into_outcome)
    }

    /// Delete every record matching the request filters.
    pub fn delete_all(&self, ctx: &RequestContext) -> Outcome<Vec<Record>> {
        self.try_delete_all(ctx).unwrap_or_else(Halt::into_outcome)
    }

    /// Fetch a single record.
    pub fn get(&self, ctx: &RequestContext, record_id: &str) -> Outcome<Record> {
        self.try_get(ctx, record_id)
            .unwrap_or_else(Halt::into_outcome)
    }

    /// Replace a record entirely, creating it if missing.
    pub fn replace(&self, ctx: &RequestContext, record_id: &str, payload: Record) -> Outcome<Record> {
        self.try_replace(ctx, record_id, payload)
            .unwrap_or_else(Halt::into_outcome)
    }

    /// Apply a partial update.
    pub fn patch(&self, ctx: &RequestContext, record_id: &str, changes: Record) -> Outcome<Record> {
        self.try_patch(ctx, record_id, changes)
            .unwrap_or_else(Halt::into_outcome)
    }

    /// Delete a single record.
    pub fn delete(&self, ctx: &RequestContext, record_id: &str) -> Outcome<Record> {
        self.try_delete(ctx, record_id)
            .unwrap_or_else(Halt::into_outcome)
    }

    /// Apply `changes` over `record` and validate the result.
    ///
    /// A change to a read-only field fails unless it keeps the current value.
    pub fn merge_fields(&self, record: &Record, changes: &Record) -> Result<Record, Vec<ValidationError>> {
        for (field, value) in changes.fields() {
            let has_changed = record.get(field).is_some_and(|current| current != value);
            if has_changed && self.schema.is_readonly(field) {
                return Err(vec![ValidationError::body(
                    field.clone(),
                    format!("Cannot modify {}", field),
                )]);
            }
        }

        let mut updated = record.clone();
        for (field, value) in changes.fields() {
            updated.insert(field.clone(), value.clone());
        }

        self.schema.validate(&updated)
    }

    fn try_list(&self, ctx: &RequestContext) -> Result<Outcome<Vec<Record>>, Halt> {
        let timestamp = self.storage.collection_timestamp(&self.schema)?;
        ctx.preconditions.check_not_modified(timestamp)?;
        ctx.preconditions.check_unmodified(timestamp)?;

        let filters = extract_filters(&ctx.query, &self.schema)?;
        let sorting = extract_sorting(ctx.query_param(SORT_PARAM), &self.schema)?;
        let pagination = extract_pagination(&ctx.query, &sorting, self.config.paginate_by)?;

        let include_deleted = filters.iter().any(|f| f.field == MODIFIED_FIELD);
        let query = ListQuery {
            filters,
            sorting,
            pagination_rules: pagination.rules,
            // One extra record tells whether another page follows
            limit: pagination.limit.map(|limit| limit.saturating_add(1)),
            include_deleted,
        };

        let RecordSet { mut records, total } = self.storage.get_all(&self.schema, &query)?;
        let mut meta = ResponseMeta::last_modified(timestamp).with_total_records(total);

        if let Some(limit) = pagination.limit {
            if records.len() > limit {
                records.truncate(limit);
                if let Some(last) = records.last() {
                    let token = PaginationToken::from_record(&query.sorting, last).encode();
                    meta.next_page = Some(NextPage::new(&ctx.query, limit, token));
                }
            }
        }

        Ok(Outcome::Ok {
            body: records,
            meta,
        })
    }

    fn try_create(&self, ctx: &RequestContext, payload: Record) -> Result<Outcome<Record>, Halt> {
        let timestamp = self.storage.collection_timestamp(&self.schema)?;
        ctx.preconditions.check_unmodified(timestamp)?;

        let record = self.schema.validate(&payload)?;
        let record = self.processor.process(record, None)?;

        let created = self.storage.create(&self.schema, record)?;
        tracing::debug!(collection = %self.schema.name, id = ?created.id(), "record created");

        Ok(Outcome::Created {
            meta: meta_for(&created),
            body: created,
        })
    }

    fn try_delete_all(&self, ctx: &RequestContext) -> Result<Outcome<Vec<Record>>, Halt> {
        if !self.config.delete_collection_enabled {
            return Err(Halt::MethodNotAllowed);
        }

        let timestamp = self.storage.collection_timestamp(&self.schema)?;
        ctx.preconditions.check_unmodified(timestamp)?;

        let filters = extract_filters(&ctx.query, &self.schema)?;
        let deleted = self.storage.delete_all(&self.schema, &filters)?;
        tracing::debug!(collection = %self.schema.name, count = deleted.len(), "records deleted");

        let timestamp = self.storage.collection_timestamp(&self.schema)?;
        Ok(Outcome::Ok {
            body: deleted,
            meta: ResponseMeta::last_modified(timestamp),
        })
    }

    fn try_get(&self, ctx: &RequestContext, record_id: &str) -> Result<Outcome<Record>, Halt> {
        let record = self.storage.get(&self.schema, record_id)?;
        let timestamp = timestamp_of(&record);
        ctx.preconditions.check_not_modified(timestamp)?;
        ctx.preconditions.check_unmodified(timestamp)?;

        Ok(Outcome::Ok {
            meta: meta_for(&record),
            body: record,
        })
    }

    fn try_replace(
        &self,
        ctx: &RequestContext,
        record_id: &str,
        mut payload: Record,
    ) -> Result<Outcome<Record>, Halt> {
        let existing = match self.storage.get(&self.schema, record_id) {
            Ok(record) => Some(record),
            Err(Error::RecordNotFound(_)) => None,
            Err(err) => return Err(err.into()),
        };
        if let Some(existing) = &existing {
            ctx.preconditions.check_unmodified(timestamp_of(existing))?;
        }

        match payload.get(ID_FIELD) {
            None => payload.set_id(record_id),
            Some(Value::String(id)) if id == record_id => {}
            Some(_) => {
                return Err(ValidationError::body(
                    ID_FIELD,
                    "Record id does not match existing record",
                )
                .into())
            }
        }

        let record = self.schema.validate(&payload)?;
        let record = self.processor.process(record, existing.as_ref())?;
        let stored = self.storage.update(&self.schema, record_id, record)?;

        let meta = meta_for(&stored);
        Ok(match existing {
            Some(_) => Outcome::Ok { body: stored, meta },
            None => Outcome::Created { body: stored, meta },
        })
    }

    fn try_patch(
        &self,
        ctx: &RequestContext,
        record_id: &str,
        changes: Record,
    ) -> Result<Outcome<Record>, Halt> {
        let record = self.storage.get(&self.schema, record_id)?;
        ctx.preconditions.check_unmodified(timestamp_of(&record))?;

        let updated = self.merge_fields(&record, &changes)?;
        let updated = self.processor.process(updated, Some(&record))?;

        // Only the requested fields decide whether anything changed
        let nothing_changed = changes
            .fields()
            .keys()
            .all(|field| record.get(field) == updated.get(field));
        if nothing_changed {
            tracing::debug!(collection = %self.schema.name, id = record_id, "patch is a no-op");
            return Ok(Outcome::Ok {
                meta: meta_for(&record),
                body: record,
            });
        }

        let stored = self.storage.update(&self.schema, record_id, updated)?;
        Ok(Outcome::Ok {
            meta: meta_for(&stored),
            body: stored,
        })
    }

    fn try_delete(&self, ctx: &RequestContext, record_id: &str) -> Result<Outcome<Record>, Halt> {
        let record = self.storage.get(&self.schema, record_id)?;
        ctx.preconditions.check_unmodified(timestamp_of(&record))?;

        let deleted = self.storage.delete(&self.schema, record_id)?;
        Ok(Outcome::Ok {
            meta: meta_for(&deleted),
            body: deleted,
        })
    }
}

fn timestamp_of(record: &Record) -> Timestamp {
    record.last_modified().unwrap_or_default()
}

fn meta_for(record: &Record) -> ResponseMeta {
    ResponseMeta::last_modified(timestamp_of(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldDef, FieldType, MemoryStorage, Preconditions};
    use serde_json::json;

    fn schema() -> CollectionSchema {
        CollectionSchema::new(
            "mushrooms",
            vec![
                FieldDef::required("name", FieldType::String).unique(),
                FieldDef::optional("size", FieldType::Int),
                FieldDef::optional("origin", FieldType::String).read_only(),
            ],
        )
    }

    fn resource() -> Resource<MemoryStorage> {
        Resource::new(schema(), Arc::new(MemoryStorage::new()), ResourceConfig::default())
    }

    fn record(value: Value) -> Record {
        Record::from_value(value).unwrap()
    }

    fn create(resource: &Resource<MemoryStorage>, value: Value) -> Record {
        resource
            .create(&RequestContext::new(), record(value))
            .into_body()
            .unwrap()
    }

    fn unmodified_since(timestamp: Timestamp) -> RequestContext {
        RequestContext::new().with_preconditions(Preconditions::new().unmodified_since(timestamp))
    }

    fn modified_since(timestamp: Timestamp) -> RequestContext {
        RequestContext::new().with_preconditions(Preconditions::new().modified_since(timestamp))
    }

    #[test]
    fn create_reports_created() {
        let resource = resource();
        let outcome = resource.create(&RequestContext::new(), record(json!({"name": "Morel"})));

        match outcome {
            Outcome::Created { body, meta } => {
                assert_eq!(body.value_of("name"), &json!("Morel"));
                assert_eq!(meta.last_modified, body.last_modified());
            }
            other => panic!("expected created, got {:?}", other),
        }
    }

    #[test]
    fn create_validates_payload() {
        let resource = resource();
        let outcome = resource.create(&RequestContext::new(), record(json!({"name": 42})));

        match outcome {
            Outcome::Invalid(errors) => assert_eq!(errors[0].name.as_deref(), Some("name")),
            other => panic!("expected invalid, got {:?}", other),
        }
    }

    #[test]
    fn create_conflict_names_field_and_existing() {
        let resource = resource();
        let existing = create(&resource, json!({"name": "Morel"}));

        let outcome = resource.create(&RequestContext::new(), record(json!({"name": "Morel"})));
        match outcome {
            Outcome::Conflict(conflict) => {
                assert_eq!(conflict.field, "name");
                assert_eq!(conflict.existing, existing);
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn create_rejected_when_collection_moved_on() {
        let resource = resource();
        let existing = create(&resource, json!({"name": "Morel"}));
        let timestamp = existing.last_modified().unwrap();

        let outcome = resource.create(&unmodified_since(timestamp - 1), record(json!({"name": "Cep"})));
        assert_eq!(
            outcome,
            Outcome::PreconditionFailed {
                last_modified: timestamp,
                message: "Resource was modified meanwhile".into(),
            }
        );

        let outcome = resource.create(&unmodified_since(timestamp), record(json!({"name": "Cep"})));
        assert!(outcome.is_success());
    }

    #[test]
    fn processor_runs_before_write() {
        let resource = resource().with_processor(
            |mut new: Record, old: Option<&Record>| -> Result<Record, Vec<ValidationError>> {
                if old.is_none() {
                    new.insert("origin", "forest");
                }
                Ok(new)
            },
        );

        let created = create(&resource, json!({"name": "Morel"}));
        assert_eq!(created.value_of("origin"), &json!("forest"));
    }

    #[test]
    fn list_not_modified_on_current_timestamp() {
        let resource = resource();
        let existing = create(&resource, json!({"name": "Morel"}));
        let timestamp = existing.last_modified().unwrap();

        assert_eq!(
            resource.list(&modified_since(timestamp)),
            Outcome::NotModified {
                last_modified: timestamp
            }
        );
        assert!(resource.list(&modified_since(timestamp - 1)).is_success());
    }

    #[test]
    fn list_reports_total_and_next_page() {
        let resource = resource();
        for name in ["a", "b", "c"] {
            create(&resource, json!({ "name": name }));
        }

        let ctx = RequestContext::new().with_query([("_limit", "2")]);
        let outcome = resource.list(&ctx);
        let meta = outcome.meta().unwrap().clone();
        let records = outcome.into_body().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(meta.total_records, Some(3));
        let next = meta.next_page.expect("a third record remains");
        assert!(next.params().contains(&("_limit".to_string(), "2".to_string())));

        let ctx = RequestContext::new().with_query(next.params().to_vec());
        let outcome = resource.list(&ctx);
        assert!(outcome.meta().unwrap().next_page.is_none());
        assert_eq!(outcome.into_body().unwrap().len(), 1);
    }

    #[test]
    fn list_uses_configured_page_size() {
        let config = ResourceConfig {
            paginate_by: Some(1),
            ..Default::default()
        };
        let resource = Resource::new(schema(), Arc::new(MemoryStorage::new()), config);
        create(&resource, json!({"name": "a"}));
        create(&resource, json!({"name": "b"}));

        let outcome = resource.list(&RequestContext::new());
        assert!(outcome.meta().unwrap().next_page.is_some());
        assert_eq!(outcome.into_body().unwrap().len(), 1);
    }

    #[test]
    fn list_exact_page_has_no_next_link() {
        let resource = resource();
        create(&resource, json!({"name": "a"}));
        create(&resource, json!({"name": "b"}));

        let outcome = resource.list(&RequestContext::new().with_query([("_limit", "2")]));
        assert!(outcome.meta().unwrap().next_page.is_none());
    }

    #[test]
    fn list_rejects_bad_query() {
        let resource = resource();
        for (key, value) in [("colour", "red"), ("_sort", "colour"), ("_limit", "x"), ("_token", "!!")] {
            let outcome = resource.list(&RequestContext::new().with_query([(key, value)]));
            assert!(matches!(outcome, Outcome::Invalid(_)), "{}={}", key, value);
        }
    }

    #[test]
    fn list_includes_tombstones_only_when_filtering_on_timestamp() {
        let resource = resource();
        let morel = create(&resource, json!({"name": "Morel"}));
        let since = morel.last_modified().unwrap();
        create(&resource, json!({"name": "Cep"}));
        resource.delete(&RequestContext::new(), morel.id().unwrap());

        let live = resource.list(&RequestContext::new()).into_body().unwrap();
        assert_eq!(live.len(), 1);

        let ctx = RequestContext::new().with_query([("_since", (since - 1).to_string())]);
        let synced = resource.list(&ctx).into_body().unwrap();
        assert_eq!(synced.len(), 2);
        assert!(synced.iter().any(Record::is_deleted));
    }

    #[test]
    fn delete_all_disabled() {
        let config = ResourceConfig {
            delete_collection_enabled: false,
            ..Default::default()
        };
        let resource = Resource::new(schema(), Arc::new(MemoryStorage::new()), config);
        create(&resource, json!({"name": "Morel"}));

        let ctx = RequestContext::new().with_query([("name", "Morel")]);
        assert_eq!(resource.delete_all(&ctx), Outcome::MethodNotAllowed);
        assert_eq!(resource.list(&RequestContext::new()).into_body().unwrap().len(), 1);
    }

    #[test]
    fn delete_all_with_filters() {
        let resource = resource();
        create(&resource, json!({"name": "Morel", "size": 1}));
        create(&resource, json!({"name": "Cep", "size": 2}));

        let ctx = RequestContext::new().with_query([("size", "1")]);
        let deleted = resource.delete_all(&ctx).into_body().unwrap();
        assert_eq!(deleted.len(), 1);
        assert!(deleted[0].is_deleted());

        let remaining = resource.list(&RequestContext::new()).into_body().unwrap();
        assert_eq!(remaining[0].value_of("name"), &json!("Cep"));
    }

    #[test]
    fn get_missing_record() {
        let resource = resource();
        assert_eq!(
            resource.get(&RequestContext::new(), "nope"),
            Outcome::NotFound {
                record_id: "nope".into()
            }
        );
    }

    #[test]
    fn get_not_modified_against_record_timestamp() {
        let resource = resource();
        let morel = create(&resource, json!({"name": "Morel"}));
        let timestamp = morel.last_modified().unwrap();
        create(&resource, json!({"name": "Cep"}));

        let outcome = resource.get(&modified_since(timestamp), morel.id().unwrap());
        assert_eq!(outcome, Outcome::NotModified { last_modified: timestamp });
    }

    #[test]
    fn replace_rejects_mismatched_id() {
        let resource = resource();
        let morel = create(&resource, json!({"name": "Morel"}));

        let outcome = resource.replace(
            &RequestContext::new(),
            morel.id().unwrap(),
            record(json!({"id": "other", "name": "Cep"})),
        );
        match outcome {
            Outcome::Invalid(errors) => {
                assert_eq!(errors[0].name.as_deref(), Some("id"));
                assert_eq!(errors[0].description, "Record id does not match existing record");
            }
            other => panic!("expected invalid, got {:?}", other),
        }
    }

    #[test]
    fn replace_existing_and_missing() {
        let resource = resource();
        let morel = create(&resource, json!({"name": "Morel", "size": 3}));
        let id = morel.id().unwrap();

        let outcome = resource.replace(&RequestContext::new(), id, record(json!({"name": "Morille"})));
        let replaced = match outcome {
            Outcome::Ok { body, .. } => body,
            other => panic!("expected ok, got {:?}", other),
        };
        assert_eq!(replaced.id(), Some(id));
        assert!(!replaced.contains("size"));

        let outcome = resource.replace(&RequestContext::new(), "fresh", record(json!({"name": "Cep"})));
        assert!(matches!(outcome, Outcome::Created { .. }));
    }

    #[test]
    fn replace_guarded_by_record_timestamp() {
        let resource = resource();
        let morel = create(&resource, json!({"name": "Morel"}));
        let timestamp = morel.last_modified().unwrap();

        let outcome = resource.replace(
            &unmodified_since(timestamp - 1),
            morel.id().unwrap(),
            record(json!({"name": "Cep"})),
        );
        assert!(matches!(outcome, Outcome::PreconditionFailed { last_modified, .. } if last_modified == timestamp));
        assert_eq!(
            resource.get(&RequestContext::new(), morel.id().unwrap()).into_body(),
            Some(morel)
        );
    }

    #[test]
    fn patch_merges_changes() {
        let resource = resource();
        let morel = create(&resource, json!({"name": "Morel", "size": 3}));

        let outcome = resource.patch(&RequestContext::new(), morel.id().unwrap(), record(json!({"size": 4})));
        let patched = outcome.into_body().unwrap();

        assert_eq!(patched.value_of("name"), &json!("Morel"));
        assert_eq!(patched.value_of("size"), &json!(4));
        assert!(patched.last_modified() > morel.last_modified());
    }

    #[test]
    fn patch_no_op_skips_write() {
        let resource = resource();
        let morel = create(&resource, json!({"name": "Morel", "size": 3}));
        let before = resource.storage().collection_timestamp(resource.schema()).unwrap();

        let outcome = resource.patch(&RequestContext::new(), morel.id().unwrap(), record(json!({"size": 3})));

        assert_eq!(outcome.into_body(), Some(morel));
        let after = resource.storage().collection_timestamp(resource.schema()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn patch_read_only_field() {
        let resource = resource();
        let morel = create(&resource, json!({"name": "Morel", "origin": "forest"}));
        let id = morel.id().unwrap();

        let outcome = resource.patch(&RequestContext::new(), id, record(json!({"origin": "garden"})));
        match outcome {
            Outcome::Invalid(errors) => assert_eq!(errors[0].description, "Cannot modify origin"),
            other => panic!("expected invalid, got {:?}", other),
        }

        let outcome = resource.patch(&RequestContext::new(), id, record(json!({"id": "other"})));
        assert!(matches!(outcome, Outcome::Invalid(_)));

        // Same value is fine
        let outcome = resource.patch(&RequestContext::new(), id, record(json!({"origin": "forest"})));
        assert!(outcome.is_success());
    }

    #[test]
    fn patch_conflict() {
        let resource = resource();
        create(&resource, json!({"name": "Morel"}));
        let cep = create(&resource, json!({"name": "Cep"}));

        let outcome = resource.patch(&RequestContext::new(), cep.id().unwrap(), record(json!({"name": "Morel"})));
        assert!(matches!(outcome, Outcome::Conflict(c) if c.field == "name"));
    }

    #[test]
    fn delete_returns_tombstone() {
        let resource = resource();
        let morel = create(&resource, json!({"name": "Morel"}));
        let id = morel.id().unwrap();

        let deleted = resource.delete(&RequestContext::new(), id).into_body().unwrap();
        assert!(deleted.is_deleted());
        assert_eq!(deleted.id(), Some(id));

        assert!(matches!(
            resource.delete(&RequestContext::new(), id),
            Outcome::NotFound { .. }
        ));
    }

    #[test]
    fn delete_guarded_by_record_timestamp() {
        let resource = resource();
        let morel = create(&resource, json!({"name": "Morel"}));
        let timestamp = morel.last_modified().unwrap();

        let outcome = resource.delete(&unmodified_since(timestamp - 1), morel.id().unwrap());
        assert!(matches!(outcome, Outcome::PreconditionFailed { .. }));
        assert!(resource.get(&RequestContext::new(), morel.id().unwrap()).is_success());
    }
}
