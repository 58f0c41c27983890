//! Gateway adapter shape translation over a scripted transport.

mod common;

use common::StubTransport;
use routechat_lib::api::TransportError;
use routechat_lib::{Gateway, GatewayError};
use serde_json::json;

#[tokio::test]
async fn test_list_models_unwraps_available_models() {
    let stub = StubTransport::new().reply("/models", json!({ "available_models": ["gpt-4o", "llama3"] }));
    let gateway = Gateway::new(&stub);

    let models = gateway.list_models().await.expect("Failed to list models");

    assert_eq!(models, vec!["gpt-4o", "llama3"]);
}

#[tokio::test]
async fn test_ask_posts_text_and_returns_whole_body() {
    let body = json!({ "answer": "hi", "agent": "text" });
    let stub = StubTransport::new().reply("/route", body.clone());
    let gateway = Gateway::new(&stub);

    let reply = gateway.ask("hello").await.expect("Failed to ask");

    assert_eq!(reply.into_value(), body);
    assert_eq!(stub.calls()[0].body, Some(json!({ "text": "hello" })));
}

#[tokio::test]
async fn test_ask_rejects_empty_question() {
    let stub = StubTransport::new();
    let gateway = Gateway::new(&stub);

    let err = gateway.ask("  ").await.unwrap_err();

    assert!(matches!(err, GatewayError::EmptyQuestion));
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn test_transport_errors_propagate_unchanged() {
    let stub = StubTransport::new().fail("/route", "network down");
    let gateway = Gateway::new(&stub);

    let err = gateway.ask("hello").await.unwrap_err();

    match err {
        GatewayError::Transport(TransportError::Other(message)) => assert_eq!(message, "network down"),
        other => panic!("unexpected error: {:?}", other),
    }
}
