//! Storage entity traits and types

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::domain::DomainError;

/// Store-assigned document identifier
///
/// Generated by the store on insert and never reused. Clients cannot choose it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Wrap an identifier received from outside (path segment, token subject)
    pub fn from_external(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trait for documents that can be stored in a collection
pub trait StorageEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    /// Name of the collection the documents live in
    const COLLECTION: &'static str;

    /// Fields the store must keep unique across the collection
    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    /// Values of the unique fields, in the order of `UNIQUE_FIELDS`
    fn unique_values(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Resolves `field` to one of `E`'s unique fields
///
/// Lookups by field are only supported where the store keeps an index.
pub fn unique_field<E: StorageEntity>(field: &str) -> Result<&'static str, DomainError> {
    E::UNIQUE_FIELDS
        .iter()
        .find(|unique| **unique == field)
        .copied()
        .ok_or_else(|| {
            DomainError::internal(format!(
                "'{}' is not a unique field of {}",
                field,
                E::COLLECTION
            ))
        })
}

/// Whether `document` holds `value` in the unique `field`
pub fn holds_unique_value<E: StorageEntity>(document: &E, field: &str, value: &str) -> bool {
    document
        .unique_values()
        .iter()
        .any(|(f, v)| *f == field && v == value)
}

/// A document as held by the store: identifier and revision wrapped around the payload
///
/// Deliberately not serializable; outputs are shaped from it explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<E> {
    id: DocumentId,
    version: u32,
    document: E,
}

impl<E> Stored<E> {
    pub fn new(id: DocumentId, version: u32, document: E) -> Self {
        Self {
            id,
            version,
            document,
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Revision counter, bumped on every update
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn document(&self) -> &E {
        &self.document
    }

    pub fn into_document(self) -> E {
        self.document
    }

    /// Replace the payload and bump the revision
    pub fn revise(self, document: E) -> Self {
        Self {
            id: self.id,
            version: self.version + 1,
            document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    impl StorageEntity for Note {
        const COLLECTION: &'static str = "notes";
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = DocumentId::generate();
        let b = DocumentId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn test_default_unique_values_empty() {
        let note = Note {
            text: "hello".to_string(),
        };
        assert!(note.unique_values().is_empty());
        assert!(Note::UNIQUE_FIELDS.is_empty());
    }

    #[test]
    fn test_unique_field_lookup() {
        assert!(matches!(
            unique_field::<Note>("text"),
            Err(DomainError::Internal { .. })
        ));
    }

    #[test]
    fn test_revise_bumps_version_keeps_id() {
        let id = DocumentId::from_external("doc-1");
        let stored = Stored::new(id.clone(), 0, Note { text: "a".into() });

        let revised = stored.revise(Note { text: "b".into() });

        assert_eq!(revised.id(), &id);
        assert_eq!(revised.version(), 1);
        assert_eq!(revised.document().text, "b");
    }
}
