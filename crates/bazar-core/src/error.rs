//! # Error Types
//!
//! Domain-specific error types for bazar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bazar-core errors (this file)                                         │
//! │  └── ActionError      - A raw action could not be decoded              │
//! │                                                                         │
//! │  storefront errors (in app)                                            │
//! │  └── ApiError         - What the browser sees (serialized)             │
//! │                                                                         │
//! │  The reducer itself has no error type: every CartAction is total.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Action Error
// =============================================================================

/// A `{ type, payload }` envelope that does not describe a valid cart action.
///
/// The store logs and drops these; they never reach the reducer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The `type` tag names no known action.
    #[error("Unknown cart action: {0}")]
    UnknownKind(String),

    /// The action needs a payload and none was sent.
    #[error("{kind} requires a payload")]
    MissingPayload { kind: String },

    /// The payload is present but does not name a product.
    #[error("Invalid {kind} payload: {reason}")]
    InvalidPayload { kind: String, reason: String },
}

/// Convenience type alias for Results with ActionError.
pub type ActionResult<T> = Result<T, ActionError>;

// =============================================================================
// Unit Tests
// =============================================================================
