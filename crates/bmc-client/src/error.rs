//! Error types for the backend client
//!
//! Three kinds of failure reach the user, each as a human-readable message:
//! - Validation: required input missing, raised before any request
//! - Backend: non-success status, message taken from the response body
//! - Network: transport failure, reported as "Network error"
//!
//! Responses that do not match the endpoint's schema fail fast as
//! [`ApiError::Schema`].

use std::fmt;

/// Backend operation, used for fallback messages and log context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// POST /api/business-ideas/idea
    SubmitIdea,
    /// GET /api/business-ideas/{userId}/{ideaId}
    FetchIdea,
    /// PUT /api/business-ideas/{ideaId}/version-history
    UpdateVersionHistory,
    /// GET /api/business-ideas/{userId}
    ListIdeas,
    /// POST /api/users/login
    Login,
    /// POST /api/users/signup
    Signup,
}

impl Endpoint {
    /// Message shown when a failed response carries none
    #[inline]
    #[must_use]
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::SubmitIdea => "Failed to submit idea",
            Self::FetchIdea => "Failed to fetch idea",
            Self::UpdateVersionHistory => "Failed to update version history",
            Self::ListIdeas => "Failed to fetch ideas",
            Self::Login => "Login failed",
            Self::Signup => "Signup failed",
        }
    }

    /// Short operation name
    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::SubmitIdea => "submit-idea",
            Self::FetchIdea => "fetch-idea",
            Self::UpdateVersionHistory => "update-version-history",
            Self::ListIdeas => "list-ideas",
            Self::Login => "login",
            Self::Signup => "signup",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Backend client error
///
/// `Display` is the message shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Required input missing or invalid; no request was made
    #[error("{0}")]
    Validation(String),

    /// Backend answered with a non-success status
    #[error("{message}")]
    Backend {
        endpoint: Endpoint,
        status: u16,
        message: String,
    },

    /// Transport failure; the cause is logged, not surfaced
    #[error("Network error")]
    Network { endpoint: Endpoint },

    /// Response body does not match the endpoint's schema
    #[error("Unexpected response from {endpoint}: {reason}")]
    Schema { endpoint: Endpoint, reason: String },

    /// Client could not be configured
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Create validation error
    #[inline]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Backend error with the message extracted from a response body
    #[must_use]
    pub fn from_response(endpoint: Endpoint, status: u16, body: &[u8]) -> Self {
        let message = backend_message(body)
            .unwrap_or_else(|| endpoint.fallback_message().to_string());
        Self::Backend {
            endpoint,
            status,
            message,
        }
    }

    /// Check if a repeat of the same request could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Backend { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status, for backend errors
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// `message` or `error` string field of a JSON error body
fn backend_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(serde_json::Value::as_str))
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}
