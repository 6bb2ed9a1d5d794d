// src/db/document_store.rs

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

// Coleções usadas pelo sistema
pub const ITEMS: &str = "items";
pub const SUPPLIERS: &str = "suppliers";
pub const SALES: &str = "sales";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Documento '{id}' não encontrado em '{collection}'")]
    NotFound { collection: String, id: String },

    #[error("O documento precisa ser um objeto JSON")]
    NotAnObject,

    #[error("Erro de banco de dados: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Erro de serialização: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

/// Um registro sem esquema, identificado pela chave gerada pelo store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    /// Converte o documento num registro tipado, injetando o `id`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        let mut data = match self.data {
            Value::Object(map) => map,
            other => return serde_json::from_value(other),
        };
        data.insert("id".to_string(), Value::String(self.id));
        serde_json::from_value(Value::Object(data))
    }
}

/// Serializa um registro tipado para gravação, removendo o `id`
/// (a chave pertence ao store, não aos campos).
pub fn fields_of<T: Serialize>(record: &T) -> Result<Value, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(mut map) => {
            map.remove("id");
            Ok(Value::Object(map))
        }
        _ => Err(StoreError::NotAnObject),
    }
}

fn into_object(fields: Value) -> Result<Map<String, Value>, StoreError> {
    match fields {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject),
    }
}

/// Interface CRUD genérica sobre coleções nomeadas.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    async fn get_one(&self, collection: &str, id: &str) -> Result<Document, StoreError>;

    /// Cria o documento e devolve a chave gerada.
    async fn create(&self, collection: &str, fields: Value) -> Result<String, StoreError>;

    /// Merge raso dos campos de primeiro nível. Documento inexistente é `NotFound`.
    async fn update(&self, collection: &str, id: &str, partial: Value) -> Result<(), StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

// ---
// Implementação em memória (desenvolvimento e testes)
// ---

#[derive(Default)]
struct Collection {
    // seq -> (id, dados); mantém a ordem de inserção
    rows: BTreeMap<u64, (String, Map<String, Value>)>,
    index: HashMap<String, u64>,
}

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
    seq: AtomicU64,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let guard = self.collections.read().await;
        let docs = guard
            .get(collection)
            .map(|c| {
                c.rows
                    .values()
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: Value::Object(data.clone()),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(docs)
    }

    async fn get_one(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        let guard = self.collections.read().await;
        guard
            .get(collection)
            .and_then(|c| c.index.get(id).and_then(|seq| c.rows.get(seq)))
            .map(|(id, data)| Document {
                id: id.clone(),
                data: Value::Object(data.clone()),
            })
            .ok_or_else(|| StoreError::not_found(collection, id))
    }

    async fn create(&self, collection: &str, fields: Value) -> Result<String, StoreError> {
        let data = into_object(fields)?;
        let id = Uuid::new_v4().simple().to_string();
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);

        let mut guard = self.collections.write().await;
        let coll = guard.entry(collection.to_string()).or_default();
        coll.rows.insert(seq, (id.clone(), data));
        coll.index.insert(id.clone(), seq);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, partial: Value) -> Result<(), StoreError> {
        let patch = into_object(partial)?;

        let mut guard = self.collections.write().await;
        let (_, data) = guard
            .get_mut(collection)
            .and_then(|c| {
                let seq = *c.index.get(id)?;
                c.rows.get_mut(&seq)
            })
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        for (key, value) in patch {
            data.insert(key, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut guard = self.collections.write().await;
        let coll = guard
            .get_mut(collection)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let seq = coll
            .index
            .remove(id)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        coll.rows.remove(&seq);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Note {
        id: String,
        text: String,
    }

    #[tokio::test]
    async fn create_then_get_returns_fields_with_generated_id() {
        let store = MemoryDocumentStore::new();
        let id = store.create("notes", json!({ "text": "olá" })).await.unwrap();

        let note: Note = store.get_one("notes", &id).await.unwrap().decode().unwrap();
        assert_eq!(note, Note { id, text: "olá".into() });
    }

    #[tokio::test]
    async fn update_merges_top_level_keys() {
        let store = MemoryDocumentStore::new();
        let id = store
            .create("notes", json!({ "text": "a", "pinned": false }))
            .await
            .unwrap();

        store.update("notes", &id, json!({ "pinned": true })).await.unwrap();

        let doc = store.get_one("notes", &id).await.unwrap();
        assert_eq!(doc.data, json!({ "text": "a", "pinned": true }));
    }

    #[tokio::test]
    async fn missing_documents_are_not_found() {
        let store = MemoryDocumentStore::new();
        assert!(matches!(
            store.get_one("notes", "x").await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.update("notes", "x", json!({})).await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete("notes", "x").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn list_keeps_insertion_order_and_skips_deleted() {
        let store = MemoryDocumentStore::new();
        let a = store.create("notes", json!({ "text": "a" })).await.unwrap();
        let b = store.create("notes", json!({ "text": "b" })).await.unwrap();
        let c = store.create("notes", json!({ "text": "c" })).await.unwrap();
        store.delete("notes", &b).await.unwrap();

        let ids: Vec<String> = store
            .list_all("notes")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn fields_of_strips_the_id() {
        let note = Note { id: "n1".into(), text: "t".into() };
        assert_eq!(fields_of(&note).unwrap(), json!({ "text": "t" }));
    }

    #[tokio::test]
    async fn non_object_payloads_are_rejected() {
        let store = MemoryDocumentStore::new();
        assert!(matches!(
            store.create("notes", json!([1, 2])).await,
            Err(StoreError::NotAnObject)
        ));
    }
}
