//! Error types for the Zammad client.
//!
//! This module defines `ZammadError`, the single error type returned by every
//! fallible operation in the crate.
//!
//! # Security
//!
//! Response bodies stored in errors are scrubbed of credentials first. Use
//! `sanitize_message()` when building messages from untrusted text.

use std::time::Duration;
use thiserror::Error;

/// Unified error type for all client operations.
///
/// Variants fall into three families: HTTP-status errors (the server answered
/// with 4xx/5xx), transport errors (the request never completed) and decode
/// errors (the server answered with something that is not JSON). The
/// remaining variants cover local validation before anything is sent.
#[derive(Error, Debug)]
pub enum ZammadError {
    /// Configuration error - missing or invalid settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The request could not be sent or the response could not be read.
    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Request timed out.
    #[error("request timed out after {duration:?} ({operation})")]
    Timeout {
        /// The configured timeout.
        duration: Duration,
        /// The operation that timed out, e.g. `GET tickets`.
        operation: String,
    },

    /// HTTP response returned a non-success status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The response body, truncated and sanitized.
        body: String,
    },

    /// The response body was not valid JSON, or not the expected shape.
    #[error("failed to decode response: {source}")]
    Decode {
        /// The underlying parser error.
        #[source]
        source: serde_json::Error,
        /// The offending body, truncated and sanitized.
        body: String,
    },

    /// JSON serialization of a request body failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A request body had the wrong JSON type.
    #[error("invalid type for {resource} parameters: expected {expected}, got {found}")]
    InvalidType {
        /// The resource the call was made on.
        resource: &'static str,
        /// The JSON type that was expected.
        expected: &'static str,
        /// The JSON type that was received.
        found: &'static str,
    },

    /// A request body was missing a key the endpoint path is built from.
    #[error("missing required parameter {parameter:?} for {resource}")]
    MissingParameter {
        /// The resource the call was made on.
        resource: &'static str,
        /// The missing key.
        parameter: String,
    },

    /// Input validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Connection test failed.
    #[error("connection test failed: {message}")]
    ConnectionTest {
        /// Details about why the connection test failed.
        message: String,
    },
}

impl ZammadError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        ZammadError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ZammadError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ZammadError::Validation(message.into())
    }

    /// Creates a missing parameter error.
    pub fn missing_parameter(resource: &'static str, parameter: impl Into<String>) -> Self {
        ZammadError::MissingParameter {
            resource,
            parameter: parameter.into(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(duration: Duration, operation: impl Into<String>) -> Self {
        ZammadError::Timeout {
            duration,
            operation: operation.into(),
        }
    }

    /// Creates a connection test error.
    pub fn connection_test(message: impl Into<String>) -> Self {
        ZammadError::ConnectionTest {
            message: message.into(),
        }
    }

    /// Returns the HTTP status for status errors.
    #[must_use]
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ZammadError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the server answered 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(reqwest::StatusCode::NOT_FOUND)
    }

    /// Returns true if the server rejected the credentials (401/403).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN)
        )
    }

    /// Returns true if the request failed before a response arrived.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, ZammadError::Transport(_) | ZammadError::Timeout { .. })
    }

    /// Replaces every occurrence of each secret with `[REDACTED]`.
    ///
    /// Empty secrets are skipped.
    #[must_use]
    pub fn sanitize_message(message: &str, secrets: &[&str]) -> String {
        secrets
            .iter()
            .filter(|s| !s.is_empty())
            .fold(message.to_string(), |msg, secret| {
                msg.replace(secret, "[REDACTED]")
            })
    }
}

/// Returns the JSON type name of a value, for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
