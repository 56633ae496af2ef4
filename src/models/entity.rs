use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A domain-model instance whose lifecycle is observed for index
/// synchronization
///
/// Implementors supply a stable identity used for index addressing and a
/// serialized snapshot of their current state. Types that can natively answer
/// "was this instance destroyed" override [`deleted`](ManagedEntity::deleted);
/// everyone else relies on the deletion-state tracker.
pub trait ManagedEntity: Send + Sync {
    /// Stable identity for index addressing, owned by the entity
    fn identity(&self) -> String;

    /// Serialized state handed to the index on upsert
    fn to_document(&self) -> Document;

    /// Native deletion query, if the type supports one
    ///
    /// `None` means the type has no such query and the observer falls back to
    /// the tracked deletion flag (or, lacking pre-destroy support, always
    /// classifies the entity as live).
    fn deleted(&self) -> Option<bool> {
        None
    }
}

/// Serialized entity state sent to the external index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Entity identity this document addresses
    pub id: String,

    /// Arbitrary JSON body; its shape is owned by the entity, not this crate
    pub body: serde_json::Value,

    /// Snapshot timestamp
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Create a document snapshotted now
    pub fn new(id: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            body,
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Note {
        id: String,
        text: String,
    }

    impl ManagedEntity for Note {
        fn identity(&self) -> String {
            self.id.clone()
        }

        fn to_document(&self) -> Document {
            Document::new(self.id.clone(), json!({ "text": self.text }))
        }
    }

    #[test]
    fn test_document_snapshot() {
        let note = Note {
            id: "note-1".to_string(),
            text: "hello".to_string(),
        };

        let doc = note.to_document();
        assert_eq!(doc.id, "note-1");
        assert_eq!(doc.body["text"], "hello");
    }

    #[test]
    fn test_deleted_defaults_to_unsupported() {
        let note = Note {
            id: "note-1".to_string(),
            text: "hello".to_string(),
        };
        assert!(note.deleted().is_none());
    }
}
