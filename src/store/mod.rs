//! Document persistence.
//!
//! Every collection holds schema-less JSON objects keyed by a generated UUID.
//! Handlers only talk to the [`DocumentStore`] trait; the PostgreSQL backend
//! is used in production and the in-memory one in tests.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

pub mod filter;
pub mod memory;
pub mod postgres;

pub use filter::Filter;
pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// A stored JSON object. Documents returned by the store carry `_id`.
pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Services,
    Bookings,
    Testimonials,
    Members,
}

impl Collection {
    /// Collection name, also used as the table name.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Services => "services",
            Collection::Bookings => "bookings",
            Collection::Testimonials => "testimonials",
            Collection::Members => "members",
        }
    }

    /// Field whose value must be unique across the collection, if any.
    pub fn unique_field(&self) -> Option<&'static str> {
        match self {
            Collection::Members => Some("userEmail"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: &'static str,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
    pub upserted_id: Option<Uuid>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate value for {field} in {collection}")]
    Duplicate {
        collection: &'static str,
        field: &'static str,
    },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("corrupt document: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents matching `filter`, in insertion order unless `sort` is given.
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> Result<Vec<Document>, StoreError>;

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError>;

    /// Inserts `doc` under a fresh id. Any client supplied `_id` is discarded.
    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<Uuid, StoreError>;

    /// Merges the top-level fields of `set` into the document with `id`.
    /// With `upsert`, a missing document is created from `set` under `id`.
    async fn update_one(
        &self,
        collection: Collection,
        id: Uuid,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Returns the number of deleted documents (0 or 1).
    async fn delete_one(&self, collection: Collection, id: Uuid) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn close(&self);
}

/// Copy of `doc` with `_id` set to `id`.
pub(crate) fn with_id(id: Uuid, mut doc: Document) -> Document {
    doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    doc
}

pub(crate) fn strip_id(mut doc: Document) -> Document {
    doc.remove(ID_FIELD);
    doc
}
