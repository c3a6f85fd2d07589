// src/error.rs
//! Application error types with structured error handling.
//!
//! Each variant names the failure mode and where it came from, so callers
//! can choose a recovery strategy by matching instead of inspecting strings.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Document API error codes as a typed vocabulary.
///
/// The API reports failures as a numeric `code` inside a `{code, msg, data}`
/// envelope. The codes that change how we react are named here; everything
/// else is carried through as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeishuErrorCode {
    /// `0`, the request succeeded
    Success,
    /// Request frequency limit hit; back off and retry
    RateLimited,
    /// Tenant token missing, invalid or expired, or the app credentials were rejected
    InvalidToken,
    /// The app lacks access to the document or resource
    PermissionDenied,
    /// The document or resource does not exist
    NotFound,
    /// A code this client does not classify
    Other(i64),
}

impl FeishuErrorCode {
    /// Parse the envelope's numeric code into the typed vocabulary.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Success,
            99991400 => Self::RateLimited,
            99991661 | 99991663 | 99991664 | 99991665 | 99991668 | 99991671 | 99991677
            | 10003 | 10014 => Self::InvalidToken,
            1770032 | 91403 | 99991672 => Self::PermissionDenied,
            1770002 | 91402 => Self::NotFound,
            other => Self::Other(other),
        }
    }

    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

impl fmt::Display for FeishuErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::RateLimited => write!(f, "rate_limited"),
            Self::InvalidToken => write!(f, "invalid_token"),
            Self::PermissionDenied => write!(f, "permission_denied"),
            Self::NotFound => write!(f, "not_found"),
            Self::Other(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Invalid document ID format: {0}")]
    InvalidId(String),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Rate limited by the document API{}", describe_retry_after(.retry_after))]
    RateLimited { retry_after: Option<Duration> },

    #[error("Document API returned an error (code {code}, HTTP {status}): {message}")]
    Api {
        code: i64,
        status: u16,
        message: String,
    },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Insufficient permission: {0}")]
    InsufficientPermission(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid retry policy: {0}")]
    InvalidRetryPolicy(String),

    #[error("Template render error for template {name}: {message}")]
    TemplateRenderError { name: String, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Failed to write export output: {}", failures.join("; "))]
    DeliveryFailed { failures: Vec<String> },

    #[error("{failed} of {total} document(s) failed to export")]
    BatchIncomplete { failed: usize, total: usize },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Classifies a non-success API envelope into the error taxonomy.
    ///
    /// HTTP 429 counts as rate limiting regardless of the body's code.
    pub fn from_api_response(
        code: i64,
        status: u16,
        message: impl Into<String>,
        retry_after: Option<Duration>,
    ) -> Self {
        let message = message.into();
        if status == 429 {
            return AppError::RateLimited { retry_after };
        }
        match FeishuErrorCode::from_code(code) {
            FeishuErrorCode::RateLimited => AppError::RateLimited { retry_after },
            FeishuErrorCode::InvalidToken => AppError::Authentication(message),
            FeishuErrorCode::PermissionDenied => AppError::InsufficientPermission(message),
            FeishuErrorCode::NotFound => AppError::DocumentNotFound(message),
            FeishuErrorCode::Success | FeishuErrorCode::Other(_) => AppError::Api {
                code,
                status,
                message,
            },
        }
    }

    /// Default retry classification: transport failures, rate limiting and
    /// server-side (5xx) API errors are transient; everything else is not.
    pub fn is_retriable(&self) -> bool {
        match self {
            AppError::NetworkFailure(_) | AppError::RateLimited { .. } => true,
            AppError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AppError::RateLimited { .. })
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            AppError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.status().map(|s| s.as_u16()) == Some(429) {
            return AppError::RateLimited { retry_after: None };
        }
        AppError::NetworkFailure(err.to_string())
    }
}

impl From<std::fmt::Error> for AppError {
    fn from(err: std::fmt::Error) -> Self {
        AppError::InternalError {
            message: "Formatting error".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

impl From<handlebars::RenderError> for AppError {
    fn from(err: handlebars::RenderError) -> Self {
        AppError::TemplateRenderError {
            name: err.template_name.clone().unwrap_or_else(|| "<inline>".to_string()),
            message: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError {
            message: format!("Background task failed: {}", err),
            source: None,
        }
    }
}

fn describe_retry_after(retry_after: &Option<Duration>) -> String {
    retry_after
        .map(|d| format!(" (retry after {:?})", d))
        .unwrap_or_default()
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_classification() {
        assert_eq!(FeishuErrorCode::from_code(0), FeishuErrorCode::Success);
        assert_eq!(
            FeishuErrorCode::from_code(99991400),
            FeishuErrorCode::RateLimited
        );
        assert_eq!(
            FeishuErrorCode::from_code(99991663),
            FeishuErrorCode::InvalidToken
        );
        assert_eq!(
            FeishuErrorCode::from_code(1770032),
            FeishuErrorCode::PermissionDenied
        );
        assert_eq!(FeishuErrorCode::from_code(91402), FeishuErrorCode::NotFound);
        assert_eq!(FeishuErrorCode::from_code(42), FeishuErrorCode::Other(42));
        assert!(FeishuErrorCode::RateLimited.is_retryable());
        assert!(!FeishuErrorCode::NotFound.is_retryable());
    }

    #[test]
    fn test_from_api_response_maps_variants() {
        assert!(AppError::from_api_response(0, 429, "slow down", None).is_rate_limited());
        assert!(AppError::from_api_response(99991400, 400, "too many", None).is_rate_limited());
        assert!(matches!(
            AppError::from_api_response(99991672, 403, "no scope", None),
            AppError::InsufficientPermission(_)
        ));
        assert!(matches!(
            AppError::from_api_response(1770002, 404, "gone", None),
            AppError::DocumentNotFound(_)
        ));
        assert!(matches!(
            AppError::from_api_response(99991663, 401, "bad token", None),
            AppError::Authentication(_)
        ));
        assert!(matches!(
            AppError::from_api_response(1770001, 400, "bad param", None),
            AppError::Api {
                code: 1770001,
                status: 400,
                ..
            }
        ));
    }

    #[test]
    fn test_retriable_classification() {
        assert!(AppError::NetworkFailure("reset".into()).is_retriable());
        assert!(AppError::RateLimited { retry_after: None }.is_retriable());
        assert!(AppError::Api {
            code: 1,
            status: 503,
            message: "unavailable".into()
        }
        .is_retriable());

        assert!(!AppError::Api {
            code: 1,
            status: 400,
            message: "bad".into()
        }
        .is_retriable());
        assert!(!AppError::Authentication("x".into()).is_retriable());
        assert!(!AppError::InsufficientPermission("x".into()).is_retriable());
        assert!(!AppError::DocumentNotFound("x".into()).is_retriable());
    }

    #[test]
    fn test_rate_limited_display_includes_retry_after() {
        let err = AppError::RateLimited {
            retry_after: Some(Duration::from_secs(2)),
        };
        assert!(err.to_string().contains("retry after 2s"));
    }
}
