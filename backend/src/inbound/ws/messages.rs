//! Wire-level frames for the WebSocket adapter.
//!
//! Clients send JSON text frames tagged by `type`. Replies are JSON too:
//! operation replies echo the client's `id`, the activity shorthand answers
//! `{"status":"logged"}`, and anything unusable gets an error frame.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{Error, OperationRequest, OperationResponse};

/// Message types the adapter understands.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientFrame {
    /// Run a registry operation as the connection's viewer.
    Operation {
        #[serde(default)]
        id: Option<Value>,
        operation: String,
        #[serde(default)]
        arguments: Value,
    },
    /// Shorthand for `logActivity`.
    Activity {
        action: String,
        #[serde(default)]
        details: String,
    },
}

impl ClientFrame {
    /// Decode a text frame, classifying failures for the error reply.
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let value: Value = serde_json::from_str(text).map_err(|_| FrameError::Malformed)?;
        let known = matches!(
            value.get("type").and_then(Value::as_str),
            Some("operation" | "activity")
        );
        if !known {
            return Err(FrameError::UnsupportedType);
        }
        serde_json::from_value(value).map_err(|err| FrameError::Invalid(err.to_string()))
    }
}

/// Why a text frame could not be handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    Malformed,
    UnsupportedType,
    Invalid(String),
}

impl FrameError {
    pub fn reply(&self) -> ErrorFrame {
        match self {
            Self::Malformed => ErrorFrame::new("malformed JSON message"),
            Self::UnsupportedType => ErrorFrame::new("unsupported message type"),
            Self::Invalid(reason) => ErrorFrame::new(format!("invalid message: {reason}")),
        }
    }
}

/// `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorFrame {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl ErrorFrame {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
        }
    }
}

impl From<&Error> for ErrorFrame {
    fn from(err: &Error) -> Self {
        Self {
            error: err.message().to_owned(),
            code: Some(err.code().as_str()),
        }
    }
}

/// `{"status": "logged"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityLogged {
    pub status: &'static str,
}

impl ActivityLogged {
    pub const fn new() -> Self {
        Self { status: "logged" }
    }
}

pub fn operation_request(operation: String, arguments: Value) -> OperationRequest {
    OperationRequest::new(operation, arguments)
}

/// Registry response with the client's correlation id added.
pub fn operation_reply(id: Option<Value>, response: &OperationResponse) -> Value {
    let mut body = match serde_json::to_value(response) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    body.insert("id".to_owned(), id.unwrap_or(Value::Null));
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("{not json", FrameError::Malformed)]
    #[case(r#"{"type":"system","command":"ls"}"#, FrameError::UnsupportedType)]
    #[case(r#"{"type":"fetch","url":"http://internal"}"#, FrameError::UnsupportedType)]
    #[case(r#"{"action":"x"}"#, FrameError::UnsupportedType)]
    fn rejects_unusable_frames(#[case] text: &str, #[case] expected: FrameError) {
        assert_eq!(ClientFrame::parse(text).expect_err("rejected"), expected);
    }

    #[rstest]
    fn missing_fields_are_invalid_not_unsupported() {
        let err = ClientFrame::parse(r#"{"type":"operation"}"#).expect_err("rejected");
        assert!(matches!(err, FrameError::Invalid(_)));
    }

    #[rstest]
    fn parses_operation_frames() {
        let frame = ClientFrame::parse(
            r#"{"type":"operation","id":7,"operation":"userById","arguments":{"id":1}}"#,
        )
        .expect("valid frame");
        match frame {
            ClientFrame::Operation {
                id,
                operation,
                arguments,
            } => {
                assert_eq!(id, Some(json!(7)));
                assert_eq!(operation, "userById");
                assert_eq!(arguments, json!({ "id": 1 }));
            }
            ClientFrame::Activity { .. } => panic!("expected operation frame"),
        }
    }

    #[rstest]
    fn replies_carry_the_correlation_id() {
        let response = OperationResponse::Data(json!({ "allUsers": [] }));
        assert_eq!(
            operation_reply(Some(json!("abc")), &response),
            json!({ "id": "abc", "data": { "allUsers": [] } })
        );
        let failure = OperationResponse::from(Error::not_found("gone"));
        let reply = operation_reply(None, &failure);
        assert_eq!(reply["id"], Value::Null);
        assert_eq!(reply["errors"][0]["code"], "not_found");
    }

    #[rstest]
    fn error_frames_serialise_compactly() {
        assert_eq!(
            serde_json::to_value(FrameError::UnsupportedType.reply()).expect("json"),
            json!({ "error": "unsupported message type" })
        );
    }
}
