// Document-store boundary. Handlers only ever see this trait; the Postgres
// implementation backs the binary and the in-memory one backs tests, so the
// store handle is injected through AppState rather than reached as a global.
pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

/// A stored document: its store id plus the schemaless JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    /// Document data with the store id merged in under `id`.
    pub fn into_value_with_id(self) -> Value {
        let Document { id, mut data } = self;
        if let Some(obj) = data.as_object_mut() {
            obj.insert("id".to_string(), Value::String(id));
        }
        data
    }
}

#[derive(Debug)]
pub enum StoreError {
    /// The addressed document does not exist.
    NotFound,
    /// A batch precondition did not hold; nothing was written.
    PreconditionFailed,
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "document not found"),
            StoreError::PreconditionFailed => write!(f, "batch precondition failed"),
            StoreError::Backend(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Debug, Clone)]
pub enum WriteOp {
    Set {
        collection: String,
        id: String,
        data: Value,
    },
    Update {
        collection: String,
        id: String,
        fields: Value,
    },
    Delete {
        collection: String,
        id: String,
    },
}

#[derive(Debug, Clone)]
pub enum Precondition {
    /// The named top-level field must equal `value` when the batch commits.
    FieldEquals {
        collection: String,
        id: String,
        field: String,
        value: Value,
    },
}

/// An all-or-nothing multi-document write. Preconditions are checked against
/// the committed state before any op applies; a failed precondition or a
/// failed op leaves the store untouched.
#[derive(Debug, Default, Clone)]
pub struct WriteBatch {
    pub(crate) preconditions: Vec<Precondition>,
    pub(crate) ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_field(mut self, collection: &str, id: &str, field: &str, value: Value) -> Self {
        self.preconditions.push(Precondition::FieldEquals {
            collection: collection.to_string(),
            id: id.to_string(),
            field: field.to_string(),
            value,
        });
        self
    }

    pub fn set(mut self, collection: &str, id: &str, data: Value) -> Self {
        self.ops.push(WriteOp::Set {
            collection: collection.to_string(),
            id: id.to_string(),
            data,
        });
        self
    }

    pub fn update(mut self, collection: &str, id: &str, fields: Value) -> Self {
        self.ops.push(WriteOp::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            fields,
        });
        self
    }

    pub fn delete(mut self, collection: &str, id: &str) -> Self {
        self.ops.push(WriteOp::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document in a collection, in store iteration order.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Insert with a store-generated id; returns the id.
    async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError>;

    /// Full-document upsert at a caller-chosen id.
    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError>;

    /// Shallow merge of top-level fields into an existing document.
    /// `NotFound` when the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError>;

    /// Documents whose top-level `field` equals `value`.
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError>;

    /// Commit a batch atomically.
    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}
