//! Dispatcher routing and logging.

use jarvis_rs_config::AssistantConfig;
use jarvis_rs_core::{Brain, JarvisError, Route};
use jarvis_rs_memory::{InteractionRecord, MemoryDocument, MemoryService, NoteRecord};
use jarvis_rs_test_utils::{FailingGenerator, FailingStore, FixedGenerator, StubExecutor};
use jarvis_rs_tools::Action;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn executor() -> StubExecutor {
    StubExecutor::new()
        .with_reply(Action::QueryTime, "It is 12:34:56.")
        .with_reply(Action::OpenBrowser, "Opening browser.")
}

fn brain_with(temp: &TempDir, generator: FixedGenerator) -> Brain {
    let memory = MemoryService::open(temp.path().join("memory.json")).expect("memory");
    Brain::new(AssistantConfig::default(), memory, executor(), generator)
}

#[tokio::test]
async fn command_prefix_runs_classified_action() {
    let temp = TempDir::new().expect("tmp");
    let mut brain = brain_with(&temp, FixedGenerator::new("unused"));

    let response = brain.handle("  run what time is it  ").await.expect("handle");

    assert_eq!(response, "It is 12:34:56.");
    assert_eq!(
        brain.memory().document().conversation,
        vec![
            InteractionRecord::user("run what time is it"),
            InteractionRecord::assistant("It is 12:34:56."),
        ]
    );
}

#[tokio::test]
async fn unknown_command_is_reported_and_logged() {
    let temp = TempDir::new().expect("tmp");
    let mut brain = brain_with(&temp, FixedGenerator::new("unused"));

    let response = brain.handle("run dance").await.expect("handle");

    assert_eq!(response, "Command not recognized.");
    assert_eq!(brain.memory().document().conversation.len(), 2);
}

#[tokio::test]
async fn executor_failure_becomes_reply() {
    let temp = TempDir::new().expect("tmp");
    let mut brain = brain_with(&temp, FixedGenerator::new("unused"));

    let response = brain.handle("run open notes").await.expect("handle");

    assert!(response.starts_with("Command failed: "));
}

#[tokio::test]
async fn remember_then_show_memory() {
    let temp = TempDir::new().expect("tmp");
    let mut brain = brain_with(&temp, FixedGenerator::new("unused"));

    assert_eq!(
        brain.handle("show memory").await.expect("empty"),
        "No saved memory yet."
    );
    assert_eq!(
        brain.handle("Remember  Buy Milk ").await.expect("remember"),
        "Saved to memory: Buy Milk"
    );
    brain.handle("remember call mom").await.expect("remember");

    let listed = brain.handle("SHOW MEMORY").await.expect("list");
    assert_eq!(listed, "Memory: Buy Milk; call mom");
    assert_eq!(brain.memory().list_notes(), vec!["Buy Milk", "call mom"]);
}

#[tokio::test]
async fn command_prefix_beats_remember_prefix() {
    let temp = TempDir::new().expect("tmp");
    let memory = MemoryService::open(temp.path().join("memory.json")).expect("memory");
    let config = AssistantConfig::builder()
        .command_prefix("remember ")
        .remember_prefix("remember ")
        .build();
    let brain = Brain::new(config, memory, executor(), FixedGenerator::new("unused"));

    assert_eq!(brain.route("remember time"), Route::Command("time"));
}

#[tokio::test]
async fn default_route_uses_generator_verbatim() {
    let temp = TempDir::new().expect("tmp");
    let generator = FixedGenerator::new("Why did the crab blush?");
    let mut brain = brain_with(&temp, generator.clone());

    let response = brain.handle(" tell me a joke ").await.expect("handle");

    assert_eq!(response, "Why did the crab blush?");
    assert_eq!(generator.prompts(), vec!["tell me a joke"]);
    assert_eq!(
        brain.memory().recent_history(2),
        vec![
            InteractionRecord::user("tell me a joke"),
            InteractionRecord::assistant("Why did the crab blush?"),
        ]
    );
}

#[tokio::test]
async fn generator_failure_propagates_without_logging() {
    let temp = TempDir::new().expect("tmp");
    let memory = MemoryService::open(temp.path().join("memory.json")).expect("memory");
    let mut brain = Brain::new(
        AssistantConfig::default(),
        memory,
        executor(),
        FailingGenerator::default(),
    );

    let err = brain.handle("hello").await.unwrap_err();

    assert!(matches!(err, JarvisError::Generator(_)));
    assert!(brain.memory().document().conversation.is_empty());
}

#[tokio::test]
async fn storage_failure_propagates() {
    let memory = MemoryService::new(FailingStore::new()).expect("memory");
    let mut brain = Brain::new(
        AssistantConfig::default(),
        memory,
        executor(),
        FixedGenerator::new("hi"),
    );

    let err = brain.handle("hello").await.unwrap_err();

    assert!(matches!(err, JarvisError::Memory(_)));
}

#[tokio::test]
async fn failed_note_save_leaves_memory_unchanged() {
    let existing = MemoryDocument {
        conversation: Vec::new(),
        notes: vec![NoteRecord::new("water plants")],
    };
    let store = FailingStore::new().with_document(existing);
    let memory = MemoryService::new(store.clone()).expect("memory");
    let mut brain = Brain::new(
        AssistantConfig::default(),
        memory,
        executor(),
        FixedGenerator::new("unused"),
    );

    let err = brain.handle("remember buy milk").await.unwrap_err();

    assert!(matches!(err, JarvisError::Memory(_)));
    assert_eq!(brain.memory().list_notes(), vec!["water plants"]);
    assert!(store.saved().is_empty());
}

#[tokio::test]
async fn failed_assistant_save_keeps_only_flushed_user_turn() {
    let store = FailingStore::fail_after(1);
    let memory = MemoryService::new(store.clone()).expect("memory");
    let mut brain = Brain::new(
        AssistantConfig::default(),
        memory,
        executor(),
        FixedGenerator::new("hi"),
    );

    let err = brain.handle("hello").await.unwrap_err();

    assert!(matches!(err, JarvisError::Memory(_)));
    assert_eq!(
        brain.memory().document().conversation,
        vec![InteractionRecord::user("hello")]
    );
    let saved = store.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(&saved[0], brain.memory().document());
}

#[tokio::test]
async fn direct_command_only_handles_known_commands() {
    let temp = TempDir::new().expect("tmp");
    let mut brain = brain_with(&temp, FixedGenerator::new("unused"));

    assert_eq!(brain.try_direct_command("hello").await.expect("none"), None);
    assert!(brain.memory().document().conversation.is_empty());

    let response = brain.try_direct_command(" Time ").await.expect("some");
    assert_eq!(response.as_deref(), Some("It is 12:34:56."));
    assert_eq!(
        brain.memory().document().conversation[0],
        InteractionRecord::user("Time")
    );
}

#[tokio::test]
async fn reset_reaches_generator() {
    let temp = TempDir::new().expect("tmp");
    let generator = FixedGenerator::new("ok");
    let mut brain = brain_with(&temp, generator.clone());

    brain.reset_conversation();

    assert_eq!(generator.resets(), 1);
}
