//! Scripted transport shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use routechat_lib::api::{Transport, TransportError};
use serde_json::Value;
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

/// Answers each path with a fixed result, optionally holding every call until released.
#[derive(Default)]
pub struct StubTransport {
    replies: Mutex<HashMap<String, Result<Value, String>>>,
    calls: Mutex<Vec<Call>>,
    gate: Option<Arc<Notify>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, path: &str, body: Value) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(path.to_string(), Ok(body));
        self
    }

    pub fn fail(self, path: &str, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(path.to_string(), Err(message.to_string()));
        self
    }

    /// Switches an already shared stub to failing on `path`.
    pub fn fail_from_now_on(&self, path: &str, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert(path.to_string(), Err(message.to_string()));
    }

    /// Every call waits for one `notify_one` on the returned handle before answering.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer(
        &self,
        method: &'static str,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body,
        });
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let reply = self.replies.lock().unwrap().get(path).cloned();
        match reply {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(TransportError::Other(message)),
            None => Err(TransportError::Other(format!("no reply scripted for {}", path))),
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        self.answer("GET", path, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        self.answer("POST", path, Some(body.clone())).await
    }
}
