// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Method-channel messages exchanged with the host.

use serde_json::{Map, Value};

use scanwerk_core::error::ScanError;
use scanwerk_core::{ResponsePayload, ScanOutcome};

/// An incoming call: a method name plus its key/value arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: String,
    pub arguments: Map<String, Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// Build a call from a JSON object; any other value yields no arguments.
    pub fn from_json(method: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(method, arguments)
    }
}

/// The single reply to a `MethodCall`.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodReply {
    /// `None` means the user cancelled.
    Success(Option<ResponsePayload>),
    Error {
        code: String,
        message: String,
        details: Option<String>,
    },
    NotImplemented,
}

impl MethodReply {
    pub fn error(err: &ScanError) -> Self {
        Self::Error {
            code: err.code().to_owned(),
            message: err.to_string(),
            details: err.details(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Error code, when this is an error reply.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Error { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<ScanOutcome> for MethodReply {
    fn from(outcome: ScanOutcome) -> Self {
        match outcome {
            Ok(payload) => Self::Success(payload),
            Err(err) => Self::error(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn error_reply_carries_code_message_and_details() {
        let reply = MethodReply::error(&ScanError::ImageEncodingFailed {
            index: 2,
            reason: "bad pixels".into(),
        });
        match reply {
            MethodReply::Error {
                code,
                message,
                details,
            } => {
                assert_eq!(code, "IMAGE_ENCODING_FAILED");
                assert!(message.contains("page 2"));
                assert_eq!(details.as_deref(), Some("bad pixels"));
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn interrupted_session_reply_carries_the_reason() {
        let outcome: ScanOutcome = Err(ScanError::SessionInterrupted("window closed".into()));
        match MethodReply::from(outcome) {
            MethodReply::Error { code, details, .. } => {
                assert_eq!(code, "SESSION_INTERRUPTED");
                assert_eq!(details.as_deref(), Some("window closed"));
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn cancellation_is_success_without_payload() {
        let outcome: ScanOutcome = Ok(None);
        let reply = MethodReply::from(outcome);
        assert_eq!(reply, MethodReply::Success(None));
        assert!(reply.is_success());
        assert_eq!(reply.code(), None);
    }

    #[test]
    fn outcome_error_becomes_error_reply() {
        let outcome: ScanOutcome = Err(ScanError::ScanAlreadyInProgress);
        let reply = MethodReply::from(outcome);
        assert_eq!(reply.code(), Some("SCAN_IN_PROGRESS"));
    }

    #[test]
    fn non_object_arguments_are_empty() {
        let call = MethodCall::from_json("scanDocuments", json!([1, 2]));
        assert!(call.arguments.is_empty());

        let call = MethodCall::from_json("scanDocuments", json!({"maxPages": 3}));
        assert_eq!(call.arguments.get("maxPages"), Some(&json!(3)));
    }
}
