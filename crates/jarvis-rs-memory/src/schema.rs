//! Versioned decoding of stored memory documents.
//!
//! This is the only place that knows about the legacy `history` layout:
//! everything returned from here is already in the current schema.

use crate::document::{InteractionRecord, MemoryDocument, NoteRecord};
use serde::Deserialize;
use serde::de::Error as _;
use serde_json::Value;

/// Layout the stored document was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// `{ "history": [{ "user": ..., "assistant": ... }] }`
    Legacy,
    /// `{ "conversation": [...], "notes": [...] }`
    Current,
}

/// Superset of every layout we have written.
#[derive(Debug, Deserialize)]
struct StoredDocument {
    #[serde(default)]
    conversation: Option<Vec<InteractionRecord>>,
    #[serde(default)]
    notes: Option<Vec<NoteRecord>>,
    #[serde(default)]
    history: Option<Vec<LegacyExchange>>,
}

/// One user/assistant pair from the legacy layout.
#[derive(Debug, Deserialize)]
struct LegacyExchange {
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    assistant: Option<String>,
}

/// Decode stored JSON into a current-schema document.
///
/// The root must be a JSON object. A `conversation` field always wins over
/// `history`; missing fields decode as empty sequences.
pub fn decode_document(
    contents: &str,
) -> Result<(MemoryDocument, SchemaVersion), serde_json::Error> {
    let value: Value = serde_json::from_str(contents)?;
    if !value.is_object() {
        return Err(serde_json::Error::custom("expected a JSON object at the root"));
    }
    let stored: StoredDocument = serde_json::from_value(value)?;
    let notes = stored.notes.unwrap_or_default();
    let (conversation, version) = match (stored.conversation, stored.history) {
        (Some(conversation), _) => (conversation, SchemaVersion::Current),
        (None, Some(history)) => (upgrade_history(history), SchemaVersion::Legacy),
        (None, None) => (Vec::new(), SchemaVersion::Current),
    };
    Ok((
        MemoryDocument {
            conversation,
            notes,
        },
        version,
    ))
}

/// Split each legacy pair into up to two records, user first, skipping empty sides.
fn upgrade_history(history: Vec<LegacyExchange>) -> Vec<InteractionRecord> {
    let mut converted = Vec::with_capacity(history.len() * 2);
    for exchange in history {
        if let Some(user) = exchange.user.filter(|text| !text.is_empty()) {
            converted.push(InteractionRecord::user(user));
        }
        if let Some(assistant) = exchange.assistant.filter(|text| !text.is_empty()) {
            converted.push(InteractionRecord::assistant(assistant));
        }
    }
    converted
}

#[cfg(test)]
mod tests {
    use super::{SchemaVersion, decode_document};
    use crate::{InteractionRecord, MemoryDocument, NoteRecord};
    use pretty_assertions::assert_eq;

    #[test]
    fn legacy_history_is_split_user_first() {
        let (document, version) =
            decode_document(r#"{"history": [{"user": "a", "assistant": "b"}]}"#).expect("decode");
        assert_eq!(version, SchemaVersion::Legacy);
        assert_eq!(
            document.conversation,
            vec![InteractionRecord::user("a"), InteractionRecord::assistant("b")]
        );
        assert!(document.notes.is_empty());
    }

    #[test]
    fn legacy_history_skips_empty_sides() {
        let (document, _) = decode_document(
            r#"{"history": [{"user": "", "assistant": "only reply"}, {"user": "only ask"}, {"assistant": null}]}"#,
        )
        .expect("decode");
        assert_eq!(
            document.conversation,
            vec![
                InteractionRecord::assistant("only reply"),
                InteractionRecord::user("only ask"),
            ]
        );
    }

    #[test]
    fn conversation_wins_over_history() {
        let (document, version) = decode_document(
            r#"{"conversation": [{"role": "user", "message": "new"}], "history": [{"user": "old"}]}"#,
        )
        .expect("decode");
        assert_eq!(version, SchemaVersion::Current);
        assert_eq!(document.conversation, vec![InteractionRecord::user("new")]);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let (document, version) = decode_document("{}").expect("decode");
        assert_eq!(version, SchemaVersion::Current);
        assert_eq!(document, MemoryDocument::new());

        let (document, _) =
            decode_document(r#"{"notes": [{"role": "note", "message": "n"}]}"#).expect("decode");
        assert_eq!(document.notes, vec![NoteRecord::new("n")]);
        assert!(document.conversation.is_empty());
    }

    #[test]
    fn unparsable_documents_fail() {
        assert!(decode_document("not json").is_err());
        assert!(decode_document("[1, 2, 3]").is_err());
        assert!(decode_document("[]").is_err());
        assert!(decode_document("null").is_err());
        assert!(decode_document(r#"{"conversation": [{"role": "robot", "message": "x"}]}"#).is_err());
    }
}
