//! # Cart Actions
//!
//! The closed set of mutations the cart accepts, plus decoding from the
//! browser's `{ type, payload }` envelope.
//!
//! ## Decode Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  JSON text ──► RawAction { type, payload? } ──► CartAction             │
//! │                        │                             │                  │
//! │                        │ unknown type / bad payload  │ reducer          │
//! │                        ▼                             ▼                  │
//! │                  ActionError (logged, dropped)   new Cart               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ActionError, ActionResult};
use crate::types::{ProductDescriptor, ProductId, ProductRef};

/// Tag of [`CartAction::AddItem`].
pub const ADD_ITEM: &str = "ADD_ITEM";
/// Tag of [`CartAction::RemoveItem`].
pub const REMOVE_ITEM: &str = "REMOVE_ITEM";
/// Tag of [`CartAction::DecrementItem`].
pub const DECREMENT_ITEM: &str = "DECREMENT_ITEM";
/// Tag of [`CartAction::ClearCart`].
pub const CLEAR_CART: &str = "CLEAR_CART";

// =============================================================================
// Cart Action
// =============================================================================

/// A cart mutation.
///
/// Serializes as `{ "type": "ADD_ITEM", "payload": { ... } }`. Deserializing
/// goes through [`RawAction`], so the error for a bad envelope is an
/// [`ActionError`] message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartAction {
    /// Add one unit of a product, creating its line if needed.
    AddItem(ProductDescriptor),

    /// Drop a product's line whatever its quantity.
    RemoveItem(ProductRef),

    /// Take one unit off a product's line; the last unit removes the line.
    DecrementItem(ProductRef),

    /// Empty the cart.
    ClearCart,
}

impl CartAction {
    pub fn add(product: ProductDescriptor) -> Self {
        CartAction::AddItem(product)
    }

    pub fn remove(id: impl Into<ProductId>) -> Self {
        CartAction::RemoveItem(ProductRef::new(id))
    }

    pub fn decrement(id: impl Into<ProductId>) -> Self {
        CartAction::DecrementItem(ProductRef::new(id))
    }

    /// Wire tag of this action.
    pub fn kind(&self) -> &'static str {
        match self {
            CartAction::AddItem(_) => ADD_ITEM,
            CartAction::RemoveItem(_) => REMOVE_ITEM,
            CartAction::DecrementItem(_) => DECREMENT_ITEM,
            CartAction::ClearCart => CLEAR_CART,
        }
    }

    /// Product this action targets, if any.
    pub fn product_id(&self) -> Option<&ProductId> {
        match self {
            CartAction::AddItem(product) => Some(&product.id),
            CartAction::RemoveItem(target) | CartAction::DecrementItem(target) => Some(&target.id),
            CartAction::ClearCart => None,
        }
    }
}

impl<'de> Deserialize<'de> for CartAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawAction::deserialize(deserializer)?;
        CartAction::try_from(raw).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Raw Action
// =============================================================================

/// Undecoded action envelope as dispatched by the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAction {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl RawAction {
    pub fn new(kind: impl Into<String>, payload: Option<Value>) -> Self {
        RawAction {
            kind: kind.into(),
            payload,
        }
    }
}

impl TryFrom<RawAction> for CartAction {
    type Error = ActionError;

    fn try_from(raw: RawAction) -> ActionResult<Self> {
        match raw.kind.as_str() {
            ADD_ITEM => decode_payload(ADD_ITEM, raw.payload).map(CartAction::AddItem),
            REMOVE_ITEM => decode_payload(REMOVE_ITEM, raw.payload).map(CartAction::RemoveItem),
            DECREMENT_ITEM => {
                decode_payload(DECREMENT_ITEM, raw.payload).map(CartAction::DecrementItem)
            }
            // Any payload sent along with a clear is ignored.
            CLEAR_CART => Ok(CartAction::ClearCart),
            _ => Err(ActionError::UnknownKind(raw.kind)),
        }
    }
}

fn decode_payload<T>(kind: &str, payload: Option<Value>) -> ActionResult<T>
where
    T: for<'de> Deserialize<'de>,
{
    let payload = payload.ok_or_else(|| ActionError::MissingPayload {
        kind: kind.to_string(),
    })?;

    serde_json::from_value(payload).map_err(|e| ActionError::InvalidPayload {
        kind: kind.to_string(),
        reason: e.to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
