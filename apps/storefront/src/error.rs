//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  Browser                     Rust                                       │
//! │  ───────                     ────                                       │
//! │                                                                         │
//! │  dispatch_json('{...}')                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Not JSON at all? ───── ApiError(VALIDATION_ERROR) ─────────────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Unknown / malformed action? ── logged, cart unchanged ─────────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The browser receives both a machine-readable `code` and a human-readable
//! `message`.

use bazar_core::ActionError;
use serde::Serialize;
use thiserror::Error;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "CART_ERROR",
///   "message": "Cart is empty"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Login required (401)
    Unauthorized,

    /// Cart cannot be used for the requested operation
    CartError,

    /// Internal error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts action decode errors for callers that want them reported.
impl From<ActionError> for ApiError {
    fn from(err: ActionError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_eof() {
            ApiError::validation(format!("Invalid JSON: {}", err))
        } else {
            tracing::error!("JSON encoding failed: {}", err);
            ApiError::internal("Failed to encode response")
        }
    }
}
