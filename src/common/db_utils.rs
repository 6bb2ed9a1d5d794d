use serde::de::DeserializeOwned;

use crate::{
    common::error::AppError,
    db::document_store::{Document, StoreError},
};

// ---
// Helpers da fronteira do repositório: documento sem esquema -> registro tipado
// ---

/// Decodifica um documento, transformando falhas em `MalformedRecord`.
pub(crate) fn decode_record<T: DeserializeOwned>(
    collection: &str,
    doc: Document,
) -> Result<T, AppError> {
    let id = doc.id.clone();
    doc.decode().map_err(|e| AppError::MalformedRecord {
        collection: collection.to_string(),
        id,
        reason: e.to_string(),
    })
}

/// Decodifica a coleção inteira. Registros ilegíveis são pulados com aviso,
/// para que um documento ruim não derrube a listagem.
pub(crate) fn decode_all<T: DeserializeOwned>(collection: &str, docs: Vec<Document>) -> Vec<T> {
    docs.into_iter()
        .filter_map(|doc| match decode_record(collection, doc) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("⚠️ Ignorando registro: {}", e);
                None
            }
        })
        .collect()
}

/// Troca o `NotFound` genérico do store pelo erro de domínio.
pub(crate) fn not_found_as(err: StoreError, to: impl FnOnce(String) -> AppError) -> AppError {
    match err {
        StoreError::NotFound { id, .. } => to(id),
        other => AppError::StoreError(other),
    }
}
