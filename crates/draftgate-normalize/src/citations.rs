//! Citation normalizer.

use serde_json::Value;

use draftgate_contracts::draft::Citation;

use crate::coerce::{field, identifier_at, list_of, text_at, whole_at};

fn citation(value: &Value) -> Option<Citation> {
    let obj = value.as_object()?;
    Some(Citation {
        doc_id: identifier_at(obj, &["doc_id", "docId", "document_id"])?,
        chunk_id: identifier_at(obj, &["chunk_id", "chunkId"]),
        doc_version: whole_at(obj, &["doc_version", "docVersion", "version"]),
        snippet: text_at(obj, &["snippet", "text"]),
    })
}

/// Normalize a citation list; entries without a document id are dropped.
pub fn normalize_citations(value: Option<&Value>) -> Vec<Citation> {
    list_of(value, citation)
}
