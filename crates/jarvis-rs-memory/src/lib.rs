//! Durable conversation log and note storage for the assistant.
//!
//! The persisted store owns the on-disk JSON schema (including the upgrade
//! path for the legacy `history` layout); the memory service caches the
//! document in process and flushes it after every mutation.

pub mod document;
pub mod error;
pub mod schema;
pub mod service;
pub mod store;

/// Memory error type.
pub use error::MemoryError;
/// Persisted document model.
pub use document::{InteractionRecord, InteractionRole, MemoryDocument, NoteRecord, NoteRole};
/// Versioned decoding of stored documents.
pub use schema::{SchemaVersion, decode_document};
/// In-process memory service.
pub use service::MemoryService;
/// Durable storage interface and default JSON file implementation.
pub use store::{DocumentStore, JsonFileStore};
