use jarvis_rs_memory::{DocumentStore, MemoryDocument, MemoryError};
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

/// Store whose saves start failing after a number of successes.
#[derive(Debug, Clone, Default)]
pub struct FailingStore {
    initial: MemoryDocument,
    successes_left: Arc<Mutex<usize>>,
    saved: Arc<Mutex<Vec<MemoryDocument>>>,
}

impl FailingStore {
    /// Every save fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// The first `successes` saves succeed.
    pub fn fail_after(successes: usize) -> Self {
        Self {
            successes_left: Arc::new(Mutex::new(successes)),
            ..Self::default()
        }
    }

    pub fn with_document(mut self, document: MemoryDocument) -> Self {
        self.initial = document;
        self
    }

    /// Documents accepted before the failures began.
    pub fn saved(&self) -> Vec<MemoryDocument> {
        self.saved.lock().clone()
    }
}

impl DocumentStore for FailingStore {
    fn load(&self) -> Result<MemoryDocument, MemoryError> {
        Ok(self.initial.clone())
    }

    fn save(&self, document: &MemoryDocument) -> Result<(), MemoryError> {
        let mut left = self.successes_left.lock();
        if *left == 0 {
            return Err(MemoryError::Io(io::Error::other("disk full")));
        }
        *left -= 1;
        self.saved.lock().push(document.clone());
        Ok(())
    }
}
