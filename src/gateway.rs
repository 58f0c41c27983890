use crate::api::{Transport, TransportError};
use serde_json::{json, Value};
use thiserror::Error;

pub const MODELS_PATH: &str = "/models";
pub const ROUTE_PATH: &str = "/route";

/// Key of the model list in the `/models` response.
pub const MODELS_FIELD: &str = "available_models";
/// Key the question is sent under to `/route`.
pub const QUESTION_FIELD: &str = "text";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("malformed response from {path}: {reason}")]
    MalformedResponse { path: &'static str, reason: String },

    #[error("question must not be empty")]
    EmptyQuestion,
}

/// The answer to a routed question, passed through exactly as the backend sent it.
///
/// The gateway does not promise a string here: the backend answers with its full
/// response body, which may be any JSON value.
#[derive(Debug, Clone, PartialEq)]
pub struct BotReply(pub Value);

impl BotReply {
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Translates the two backend operations into transport calls.
///
/// Holds nothing but a borrowed transport, so one can be built per call site.
pub struct Gateway<'a> {
    transport: &'a dyn Transport,
}

impl<'a> Gateway<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    pub async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        let body = self.transport.get(MODELS_PATH).await?;
        parse_models(&body)
    }

    pub async fn ask(&self, question: &str) -> Result<BotReply, GatewayError> {
        if question.trim().is_empty() {
            return Err(GatewayError::EmptyQuestion);
        }
        let body = self
            .transport
            .post(ROUTE_PATH, &json!({ QUESTION_FIELD: question }))
            .await?;
        log::debug!("Response from {}: {}", ROUTE_PATH, body);
        Ok(BotReply(body))
    }
}

fn parse_models(body: &Value) -> Result<Vec<String>, GatewayError> {
    let malformed = |reason: String| GatewayError::MalformedResponse {
        path: MODELS_PATH,
        reason,
    };

    let list = body
        .get(MODELS_FIELD)
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(format!("missing array field '{}'", MODELS_FIELD)))?;

    list.iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| malformed(format!("non-string model entry {}", item)))
        })
        .collect()
}
