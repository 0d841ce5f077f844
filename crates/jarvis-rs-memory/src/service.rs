//! In-process memory service over a document store.

use crate::document::{InteractionRecord, MemoryDocument, NoteRecord};
use crate::error::MemoryError;
use crate::store::{DocumentStore, JsonFileStore};
use log::{debug, info};
use std::path::Path;

/// Cached memory document plus the store it is flushed to.
///
/// The document is loaded once at construction. Every mutation is saved
/// through the store before the cache takes it, so a failed save leaves the
/// cache matching the last successful write.
pub struct MemoryService {
    store: Box<dyn DocumentStore>,
    document: MemoryDocument,
}

impl MemoryService {
    /// Load the document from `store`.
    pub fn new(store: impl DocumentStore + 'static) -> Result<Self, MemoryError> {
        let document = store.load()?;
        info!(
            "initialized memory service (conversation={}, notes={})",
            document.conversation.len(),
            document.notes.len()
        );
        Ok(Self {
            store: Box::new(store),
            document,
        })
    }

    /// Open the JSON file at `path`, creating it if missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MemoryError> {
        Self::new(JsonFileStore::new(path.as_ref()))
    }

    /// Append a trimmed note. Whitespace-only text is ignored.
    pub fn add_note(&mut self, text: &str) -> Result<(), MemoryError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        let mut candidate = self.document.clone();
        candidate.notes.push(NoteRecord::new(text));
        self.commit(candidate)?;
        debug!(
            "stored note (notes={}, len={})",
            self.document.notes.len(),
            text.len()
        );
        Ok(())
    }

    /// Note messages in insertion order.
    pub fn list_notes(&self) -> Vec<String> {
        self.document
            .notes
            .iter()
            .map(|note| note.message.clone())
            .collect()
    }

    /// Log one exchange, skipping empty sides. Each appended record is
    /// flushed on its own.
    pub fn add_interaction(&mut self, user: &str, assistant: &str) -> Result<(), MemoryError> {
        let user = user.trim();
        if !user.is_empty() {
            self.append(InteractionRecord::user(user))?;
        }
        let assistant = assistant.trim();
        if !assistant.is_empty() {
            self.append(InteractionRecord::assistant(assistant))?;
        }
        Ok(())
    }

    /// The last `limit` conversation records, oldest first.
    pub fn recent_history(&self, limit: usize) -> Vec<InteractionRecord> {
        let conversation = &self.document.conversation;
        let start = conversation.len().saturating_sub(limit);
        conversation[start..].to_vec()
    }

    pub fn document(&self) -> &MemoryDocument {
        &self.document
    }

    /// Backing file, when the store has one.
    pub fn path(&self) -> Option<&Path> {
        self.store.location()
    }

    fn append(&mut self, record: InteractionRecord) -> Result<(), MemoryError> {
        debug!(
            "appending interaction (role={}, len={})",
            record.role,
            record.message.len()
        );
        let mut candidate = self.document.clone();
        candidate.conversation.push(record);
        self.commit(candidate)
    }

    fn commit(&mut self, candidate: MemoryDocument) -> Result<(), MemoryError> {
        self.store.save(&candidate)?;
        self.document = candidate;
        Ok(())
    }
}

impl std::fmt::Debug for MemoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryService")
            .field("path", &self.path())
            .field("conversation", &self.document.conversation.len())
            .field("notes", &self.document.notes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryService;
    use crate::InteractionRecord;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn whitespace_is_absorbed() {
        let temp = tempdir().expect("tempdir");
        let mut memory = MemoryService::open(temp.path().join("memory.json")).expect("open");

        memory.add_note("   \n").expect("note");
        memory.add_interaction("  ", "\t").expect("interaction");

        assert!(memory.list_notes().is_empty());
        assert!(memory.document().conversation.is_empty());
    }

    #[test]
    fn notes_are_trimmed_and_ordered() {
        let temp = tempdir().expect("tempdir");
        let mut memory = MemoryService::open(temp.path().join("memory.json")).expect("open");

        memory.add_note("  buy milk ").expect("note");
        memory.add_note("call mom").expect("note");

        assert_eq!(memory.list_notes(), vec!["buy milk", "call mom"]);
        assert_eq!(memory.list_notes(), memory.list_notes());
    }

    #[test]
    fn interaction_skips_empty_side() {
        let temp = tempdir().expect("tempdir");
        let mut memory = MemoryService::open(temp.path().join("memory.json")).expect("open");

        memory.add_interaction(" hello ", "").expect("interaction");

        assert_eq!(
            memory.document().conversation,
            vec![InteractionRecord::user("hello")]
        );
    }

    #[test]
    fn recent_history_returns_tail_oldest_first() {
        let temp = tempdir().expect("tempdir");
        let mut memory = MemoryService::open(temp.path().join("memory.json")).expect("open");
        memory.add_interaction("one", "two").expect("interaction");
        memory.add_interaction("three", "four").expect("interaction");

        assert_eq!(
            memory.recent_history(3),
            vec![
                InteractionRecord::assistant("two"),
                InteractionRecord::user("three"),
                InteractionRecord::assistant("four"),
            ]
        );
        assert_eq!(memory.recent_history(10).len(), 4);
        assert!(memory.recent_history(0).is_empty());
    }
}
