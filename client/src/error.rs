//! Failure taxonomy of transport calls and its reduction to a user-facing message.
//!
//! Record sources fail in heterogeneous shapes: a bare string thrown by
//! application code, an object carrying a `message`, or a transport exception
//! wrapping the backend's error body. [`Failure`] names these shapes and
//! [`Failure::user_message`] collapses any of them into the single line shown
//! next to the table.

use core::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message shown when a failure carries no usable text.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Failure of a transport call, as seen by a cursor client.
#[derive(Debug, Clone, PartialEq, Eq, displaydoc::Display, thiserror::Error)]
pub enum Failure {
    /// Transport failure: {0}
    Transport(TransportFailure),
    /// Application failure: {0}
    Application(ApplicationFailure),
    /// Unknown failure
    Unknown(Option<Value>),
}

/// Network or backend exception.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportFailure {
    /// Status reported by the backend, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Error body sent back by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<FailureBody>,
    /// Message of the exception itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error body nested in a [`TransportFailure`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureBody {
    /// Message produced by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Failure raised by application code rather than the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationFailure {
    /// Bare message
    Text(String),
    /// Structured error with an optional message
    Object {
        /// Message of the error
        message: Option<String>,
    },
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, self.nested_message().or(non_empty(&self.message))) {
            (Some(status), Some(message)) => write!(f, "{message} (status {status})"),
            (Some(status), None) => write!(f, "status {status}"),
            (None, Some(message)) => f.write_str(message),
            (None, None) => f.write_str("no details"),
        }
    }
}

impl fmt::Display for ApplicationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Object { message } => f.write_str(message.as_deref().unwrap_or("no details")),
        }
    }
}

impl TransportFailure {
    /// Failure with only a top-level message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Failure carrying the backend's error body.
    pub fn with_body(status: Option<u16>, body_message: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(FailureBody {
                message: Some(body_message.into()),
            }),
            message: None,
        }
    }

    fn nested_message(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| non_empty(&body.message))
    }
}

impl Failure {
    /// The record source did not answer within `timeout`.
    pub fn timed_out(timeout: Duration) -> Self {
        Self::Transport(TransportFailure::with_message(format!(
            "Request timed out after {} ms",
            timeout.as_millis()
        )))
    }

    /// The record source answered with something that is not a page.
    pub fn malformed_response(error: &serde_json::Error) -> Self {
        Self::Transport(TransportFailure::with_message(format!(
            "Malformed response: {error}"
        )))
    }

    /// Classify an arbitrary JSON error payload.
    ///
    /// - a string is an application message,
    /// - an object with an object `body` is a transport failure,
    /// - any other object with a `message` is an application error object,
    /// - anything else is unknown.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Application(ApplicationFailure::Text(text)),
            Value::Object(ref fields) if fields.get("body").is_some_and(Value::is_object) => {
                serde_json::from_value::<TransportFailure>(value.clone())
                    .map_or(Self::Unknown(Some(value)), Self::Transport)
            }
            Value::Object(ref fields) if fields.contains_key("message") => {
                Self::Application(ApplicationFailure::Object {
                    message: fields
                        .get("message")
                        .and_then(Value::as_str)
                        .map(str::to_owned),
                })
            }
            other => Self::Unknown(Some(other)),
        }
    }

    /// Reduce the failure to the single message shown to the user.
    ///
    /// Precedence: bare string message, then the nested body message, then
    /// the top-level message, then [`UNKNOWN_ERROR_MESSAGE`]. Empty messages
    /// count as missing.
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::Application(ApplicationFailure::Text(text)) => non_empty_str(text),
            Self::Transport(transport) => transport
                .nested_message()
                .or_else(|| non_empty(&transport.message)),
            Self::Application(ApplicationFailure::Object { message }) => non_empty(message),
            Self::Unknown(_) => None,
        };

        message.unwrap_or(UNKNOWN_ERROR_MESSAGE).to_owned()
    }
}

impl From<serde_json::Error> for Failure {
    fn from(error: serde_json::Error) -> Self {
        Self::malformed_response(&error)
    }
}

fn non_empty(message: &Option<String>) -> Option<&str> {
    message.as_deref().and_then(non_empty_str)
}

fn non_empty_str(message: &str) -> Option<&str> {
    (!message.trim().is_empty()).then_some(message)
}
