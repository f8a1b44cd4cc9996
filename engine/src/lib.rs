//! # Shelf Engine
//!
//! A collection resource engine: CRUD semantics over an abstract storage
//! backend, independent of any particular record shape.
//!
//! The engine turns untrusted query parameters into typed filters, sorts and
//! cursor pagination rules, guards writes with timestamp-based optimistic
//! concurrency, and maps storage failures to well-defined outcomes that a
//! transport layer can turn into status codes.
//!
//! ## Design Principles
//!
//! - **No transport**: Engine has no knowledge of HTTP, routing or permissions
//! - **Stateless**: All pagination state lives in an opaque token
//! - **Explicit outcomes**: Every operation returns an [`Outcome`], never panics
//! - **Pluggable storage**: Anything implementing [`Storage`] can back a resource
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! A [`Record`] is a flat JSON object. Two fields are reserved and always
//! assigned by the backend:
//! - `id` - unique within its collection
//! - `last_modified` - strictly increasing per write to the collection
//!
//! ### Query parameters
//!
//! - `?name=x`, `?min_age=18`, `?not_status=done` - see [`extract_filters`]
//! - `?_sort=-age,name` - see [`extract_sorting`]
//! - `?_since=123&_to=456` - modification window
//! - `?_limit=10&_token=...` - cursor pagination, see [`PaginationToken`]
//!
//! ### Conditional requests
//!
//! [`Preconditions`] carry the `If-Modified-Since` and `If-Unmodified-Since`
//! values. Reads short-circuit to [`Outcome::NotModified`], stale writes fail
//! with [`Outcome::PreconditionFailed`].
//!
//! ## Quick Start
//!
//! ```rust
//! use shelf_engine::{
//!     CollectionSchema, FieldDef, FieldType, MemoryStorage, Outcome, Record,
//!     RequestContext, Resource, ResourceConfig,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! // 1. Declare the collection
//! let schema = CollectionSchema::new(
//!     "mushrooms",
//!     vec![FieldDef::required("name", FieldType::String)],
//! );
//!
//! // 2. Bind it to a storage backend
//! let storage = Arc::new(MemoryStorage::new());
//! let resource = Resource::new(schema, storage, ResourceConfig::default());
//!
//! // 3. Create and list
//! let payload = Record::from_value(json!({"name": "Morel"})).unwrap();
//! let created = resource.create(&RequestContext::new(), payload);
//! assert!(matches!(created, Outcome::Created { .. }));
//!
//! let ctx = RequestContext::new().with_query([("name", "Morel")]);
//! let listed = resource.list(&ctx).into_body().unwrap();
//! assert_eq!(listed.len(), 1);
//! ```

pub mod conflict;
pub mod error;
pub mod filter;
pub mod guard;
pub mod memory;
pub mod outcome;
pub mod pagination;
pub mod record;
pub mod resource;
pub mod schema;
pub mod sort;
pub mod storage;
pub mod token;
pub mod value;

// Re-export main types at crate root
pub use conflict::Conflict;
pub use error::{Error, Location, TokenError, ValidationError};
pub use filter::{extract_filters, Comparison, Filter};
pub use guard::{GuardFailure, Preconditions, IF_MODIFIED_SINCE, IF_UNMODIFIED_SINCE};
pub use memory::MemoryStorage;
pub use outcome::{Outcome, ResponseMeta};
pub use pagination::{
    build_pagination_rules, extract_limit, extract_pagination, NextPage, Pagination,
    PaginationRules,
};
pub use record::{Record, DELETED_FIELD, ID_FIELD, MODIFIED_FIELD};
pub use resource::{RecordProcessor, RequestContext, Resource, ResourceConfig};
pub use schema::{CollectionSchema, FieldDef, FieldType, Schema};
pub use sort::{extract_sorting, Direction, Sort};
pub use storage::{ListQuery, RecordSet, Storage};
pub use token::PaginationToken;
pub use value::native_value;

/// Type aliases for clarity
pub type RecordId = String;
pub type CollectionName = String;
pub type FieldName = String;
pub type Timestamp = u64;
