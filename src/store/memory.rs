use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{Document, DocumentStore, Precondition, StoreError, WriteBatch, WriteOp};

/// In-memory document store for tests and local development. One lock covers
/// every collection, which makes batch commits trivially atomic.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn merge_fields(target: &mut Value, fields: &Value) {
    if let (Some(obj), Some(patch)) = (target.as_object_mut(), fields.as_object()) {
        for (key, value) in patch {
            obj.insert(key.clone(), value.clone());
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.lock().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.lock().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.lock().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or(StoreError::NotFound)?;
        merge_fields(doc, &fields);
        Ok(())
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.lock().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, data)| data.get(field) == Some(value))
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().await;

        for precondition in &batch.preconditions {
            let Precondition::FieldEquals {
                collection,
                id,
                field,
                value,
            } = precondition;
            let current = collections
                .get(collection)
                .and_then(|docs| docs.get(id))
                .and_then(|data| data.get(field));
            if current != Some(value) {
                return Err(StoreError::PreconditionFailed);
            }
        }

        // Update targets are checked before anything applies, so a failing
        // batch leaves no partial writes behind.
        for op in &batch.ops {
            if let WriteOp::Update { collection, id, .. } = op {
                if collections
                    .get(collection)
                    .and_then(|docs| docs.get(id))
                    .is_none()
                {
                    return Err(StoreError::NotFound);
                }
            }
        }

        for op in batch.ops {
            match op {
                WriteOp::Set {
                    collection,
                    id,
                    data,
                } => {
                    collections.entry(collection).or_default().insert(id, data);
                }
                WriteOp::Update {
                    collection,
                    id,
                    fields,
                } => {
                    if let Some(doc) = collections
                        .get_mut(&collection)
                        .and_then(|docs| docs.get_mut(&id))
                    {
                        merge_fields(doc, &fields);
                    }
                }
                WriteOp::Delete { collection, id } => {
                    if let Some(docs) = collections.get_mut(&collection) {
                        docs.remove(&id);
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn update_merges_top_level_fields() {
        let store = MemoryStore::new();
        store
            .set("vehicles", "1", json!({ "vehicleId": "1", "status": "available" }))
            .await
            .unwrap();

        store
            .update("vehicles", "1", json!({ "status": "repair" }))
            .await
            .unwrap();

        let doc = store.get("vehicles", "1").await.unwrap().unwrap();
        assert_eq!(doc.data["status"], "repair");
        assert_eq!(doc.data["vehicleId"], "1");
    }

    #[tokio::test]
    async fn update_missing_document_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update("vehicles", "ghost", json!({ "status": "repair" }))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn query_eq_matches_on_field_value() {
        let store = MemoryStore::new();
        store
            .set("reservations", "a", json!({ "vehicleId": "1" }))
            .await
            .unwrap();
        store
            .set("reservations", "b", json!({ "vehicleId": "2" }))
            .await
            .unwrap();

        let matches = store
            .query_eq("reservations", "vehicleId", &json!("1"))
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "a");
    }

    #[tokio::test]
    async fn failed_precondition_leaves_no_partial_writes() {
        let store = MemoryStore::new();
        store
            .set("vehicles", "1", json!({ "status": "reserved" }))
            .await
            .unwrap();

        let batch = WriteBatch::new()
            .require_field("vehicles", "1", "status", json!("available"))
            .set("reservations", "r1", json!({ "vehicleId": "1" }))
            .update("vehicles", "1", json!({ "status": "reserved" }));

        let err = store.commit(batch).await.unwrap_err();
        assert!(matches!(err, StoreError::PreconditionFailed));
        assert!(store.get("reservations", "r1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn batch_with_missing_update_target_applies_nothing() {
        let store = MemoryStore::new();

        let batch = WriteBatch::new()
            .set("reservations", "r1", json!({ "vehicleId": "1" }))
            .update("vehicles", "ghost", json!({ "status": "reserved" }));

        let err = store.commit(batch).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        assert!(store.get("reservations", "r1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn batch_deletes_every_listed_document() {
        let store = MemoryStore::new();
        store.set("vehicles", "1", json!({ "vehicleId": "1" })).await.unwrap();
        store
            .set("reservations", "a", json!({ "vehicleId": "1" }))
            .await
            .unwrap();
        store
            .set("reservations", "b", json!({ "vehicleId": "1" }))
            .await
            .unwrap();

        let batch = WriteBatch::new()
            .delete("vehicles", "1")
            .delete("reservations", "a")
            .delete("reservations", "b");
        store.commit(batch).await.unwrap();

        assert!(store.list("vehicles").await.unwrap().is_empty());
        assert!(store.list("reservations").await.unwrap().is_empty());
    }
}
