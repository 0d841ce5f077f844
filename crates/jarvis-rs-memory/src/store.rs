//! Durable storage for the memory document.

use crate::document::MemoryDocument;
use crate::error::MemoryError;
use crate::schema::{SchemaVersion, decode_document};
use log::{debug, info};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Loads and rewrites the whole memory document.
pub trait DocumentStore: Send {
    /// Read the stored document, creating an empty one if none exists.
    fn load(&self) -> Result<MemoryDocument, MemoryError>;
    /// Replace the stored document with `document`.
    fn save(&self, document: &MemoryDocument) -> Result<(), MemoryError>;
    /// Backing file, when the store has one.
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// Single pretty-printed JSON file.
///
/// Saves go through a sibling `.tmp` file followed by a rename so a crash
/// mid-write never leaves a truncated document behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn ensure_parent(&self) -> Result<(), MemoryError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Result<MemoryDocument, MemoryError> {
        if !self.path.exists() {
            info!(
                "memory file missing, creating empty document (path={})",
                self.path.display()
            );
            let document = MemoryDocument::new();
            self.save(&document)?;
            return Ok(document);
        }
        let contents = fs::read_to_string(&self.path)?;
        let (document, version) =
            decode_document(&contents).map_err(|err| MemoryError::Malformed {
                path: self.path.clone(),
                reason: err.to_string(),
            })?;
        if version == SchemaVersion::Legacy {
            info!(
                "upgraded legacy memory history (path={}, records={})",
                self.path.display(),
                document.conversation.len()
            );
        }
        debug!(
            "loaded memory document (path={}, conversation={}, notes={})",
            self.path.display(),
            document.conversation.len(),
            document.notes.len()
        );
        Ok(document)
    }

    fn save(&self, document: &MemoryDocument) -> Result<(), MemoryError> {
        self.ensure_parent()?;
        let contents = serde_json::to_string_pretty(document)?;
        let temp_path = self.temp_path();
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            file.write_all(contents.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;
        debug!(
            "saved memory document (path={}, bytes={})",
            self.path.display(),
            contents.len()
        );
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentStore, JsonFileStore};
    use crate::{InteractionRecord, MemoryDocument, MemoryError, NoteRecord};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn load_creates_missing_file_and_parents() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("dir").join("memory.json");
        let store = JsonFileStore::new(&path);

        let document = store.load().expect("load");
        assert_eq!(document, MemoryDocument::new());
        let written = fs::read_to_string(&path).expect("read");
        let value: serde_json::Value = serde_json::from_str(&written).expect("json");
        assert_eq!(value, serde_json::json!({ "conversation": [], "notes": [] }));
    }

    #[test]
    fn save_pretty_prints_and_leaves_no_temp_file() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("memory.json");
        let store = JsonFileStore::new(&path);
        let document = MemoryDocument {
            conversation: vec![InteractionRecord::user("hi")],
            notes: vec![NoteRecord::new("milk")],
        };

        store.save(&document).expect("save");
        let written = fs::read_to_string(&path).expect("read");
        assert!(written.contains("\n  \"conversation\": ["));
        assert!(!temp.path().join("memory.json.tmp").exists());
        assert_eq!(store.load().expect("reload"), document);
    }

    #[test]
    fn legacy_file_loads_as_current_schema() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("memory.json");
        fs::write(&path, r#"{"history": [{"user": "a", "assistant": "b"}]}"#).expect("write");

        let document = JsonFileStore::new(&path).load().expect("load");
        assert_eq!(
            document.conversation,
            vec![InteractionRecord::user("a"), InteractionRecord::assistant("b")]
        );
    }

    #[test]
    fn unparsable_file_is_malformed() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("memory.json");
        fs::write(&path, "{ not json").expect("write");

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, MemoryError::Malformed { .. }));
        assert!(err.to_string().contains("memory.json"));
    }
}
