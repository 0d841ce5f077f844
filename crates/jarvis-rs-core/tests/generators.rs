//! Response generator behaviour.

use jarvis_rs_core::{
    ChatGenerator, ChatMessage, ChatRole, FailoverGenerator, GeneratorError, OllamaGenerator, OpenAiTransport,
    ResponseGenerator,
};
use jarvis_rs_test_utils::{
    EchoGenerator, FailingGenerator, FixedGenerator, OneShotServer, RecordingTransport,
};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn chat_window_never_exceeds_capacity() {
    let transport = RecordingTransport::new("reply");
    let mut generator = ChatGenerator::new(transport.clone(), "sys", 2);

    for prompt in ["one", "two", "three", "four"] {
        generator.generate(prompt).await.expect("generate");
        assert!(generator.window().len() <= 5);
    }

    let requests = transport.requests();
    assert_eq!(requests.len(), 4);
    assert!(requests.iter().all(|request| request.len() <= 5));
    let last = requests.last().expect("last");
    assert_eq!(last[0].role, ChatRole::System);
    assert_eq!(last[0].content, "sys");
    assert_eq!(last.last().expect("user").content, "four");
}

#[tokio::test]
async fn chat_reply_is_normalized() {
    let transport = RecordingTransport::new("  concise answer  \n\n");
    let mut generator = ChatGenerator::new(transport, "sys", 2);

    assert_eq!(generator.generate("hi").await.expect("generate"), "concise answer");
    assert_eq!(
        generator.window().messages().last().expect("assistant").content,
        "concise answer"
    );
}

#[tokio::test]
async fn failed_chat_restores_window() {
    let transport = RecordingTransport::new("fine");
    transport.push_failure("timeout");
    let mut generator = ChatGenerator::new(transport.clone(), "sys", 2);

    let err = generator.generate("hello").await.unwrap_err();
    assert!(matches!(err, GeneratorError::Failed(_)));
    assert_eq!(
        generator.window().messages(),
        &[ChatMessage::new(ChatRole::System, "sys")]
    );

    assert_eq!(generator.generate("again").await.expect("retry"), "fine");
    let requests = transport.requests();
    assert_eq!(
        requests[1],
        vec![
            ChatMessage::new(ChatRole::System, "sys"),
            ChatMessage::new(ChatRole::User, "again"),
        ]
    );
    assert_eq!(generator.window().len(), 3);
}

#[tokio::test]
async fn failed_chat_on_full_window_keeps_dropped_turns() {
    let transport = RecordingTransport::new("reply");
    let mut generator = ChatGenerator::new(transport.clone(), "sys", 1);
    generator.generate("first").await.expect("first");
    let before = generator.window().clone();

    transport.push_failure("timeout");
    generator.generate("second").await.unwrap_err();

    assert_eq!(generator.window(), &before);
}

#[tokio::test]
async fn failover_uses_fallback_on_error() {
    let primary = FailingGenerator::default();
    let mut generator = FailoverGenerator::new(primary.clone(), FixedGenerator::new("backup"));

    assert_eq!(generator.generate("hi").await.expect("fallback"), "backup");
    assert_eq!(primary.calls(), 1);

    let mut healthy = FailoverGenerator::new(EchoGenerator, FailingGenerator::default());
    assert_eq!(healthy.generate("hi").await.expect("primary"), "echo: hi");
}

#[tokio::test]
async fn ollama_posts_generate_request() {
    let server = OneShotServer::start(
        200,
        r#"{"model":"llama3","response":"  hi there ","done":true}"#,
    )
    .await
    .expect("server");
    let mut generator = OllamaGenerator::new(reqwest::Client::new(), server.url(), "llama3")
        .with_system_prompt("be brief");

    let reply = generator.generate("hello").await.expect("generate");
    assert_eq!(reply, "  hi there ");

    let request = server.request().await;
    assert!(request.starts_with("POST /api/generate "));
    let body = request.split("\r\n\r\n").nth(1).expect("body");
    let body: serde_json::Value = serde_json::from_str(body).expect("json");
    assert_eq!(
        body,
        serde_json::json!({
            "model": "llama3",
            "prompt": "hello",
            "system": "be brief",
            "stream": false,
        })
    );
}

#[tokio::test]
async fn ollama_error_status_fails() {
    let server = OneShotServer::start(500, r#"{"error":"model not found"}"#)
        .await
        .expect("server");
    let mut generator = OllamaGenerator::new(reqwest::Client::new(), server.url(), "missing");

    let err = generator.generate("hello").await.unwrap_err();
    assert!(matches!(err, GeneratorError::Status { status: 500, .. }));
}

#[tokio::test]
async fn openai_transport_sends_window_with_bearer() {
    let server = OneShotServer::start(
        200,
        r#"{"choices":[{"message":{"role":"assistant","content":"  line one \n\n line two "}}]}"#,
    )
    .await
    .expect("server");
    let transport =
        OpenAiTransport::new(reqwest::Client::new(), server.url(), "gpt-4o-mini", "sk-test");
    let mut generator = ChatGenerator::new(transport, "sys", 2);

    let reply = generator.generate("hi").await.expect("generate");
    assert_eq!(reply, "line one\nline two");

    let request = server.request().await;
    assert!(request.starts_with("POST /chat/completions "));
    assert!(request.to_lowercase().contains("authorization: bearer sk-test"));
    let body = request.split("\r\n\r\n").nth(1).expect("body");
    let body: serde_json::Value = serde_json::from_str(body).expect("json");
    assert_eq!(
        body,
        serde_json::json!({
            "model": "gpt-4o-mini",
            "messages": [
                { "role": "system", "content": "sys" },
                { "role": "user", "content": "hi" },
            ],
        })
    );
}

#[tokio::test]
async fn openai_transport_rejects_empty_choices() {
    let server = OneShotServer::start(200, r#"{"choices":[]}"#)
        .await
        .expect("server");
    let transport = OpenAiTransport::new(reqwest::Client::new(), server.url(), "m", "k");
    let mut generator = ChatGenerator::new(transport, "sys", 1);

    let err = generator.generate("hi").await.unwrap_err();
    assert!(matches!(err, GeneratorError::InvalidResponse(_)));
}
