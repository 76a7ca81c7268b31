//! # Cart Commands
//!
//! Handlers the cart views call.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │          │     │ Created  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                                │
//! │                   add_to_cart                                           │
//! │                   decrement_cart_item                                   │
//! │                   remove_from_cart                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart / logout ─────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bazar_core::{CartAction, CartLine, ProductDescriptor, ProductId};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use ts_rs::TS;

use crate::error::ApiError;
use crate::state::{CartDispatcher, CartReader, CartSnapshot};

/// Cart response including lines and totals.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
    /// Store version this response was read at.
    #[ts(type = "number")]
    pub version: u64,
}

/// Cart counters for the navigation badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    #[ts(type = "number")]
    pub line_count: usize,
    #[ts(type = "number")]
    pub total_quantity: u64,
}

impl From<&CartSnapshot> for CartResponse {
    fn from(snapshot: &CartSnapshot) -> Self {
        CartResponse {
            lines: snapshot.lines().to_vec(),
            totals: CartTotals {
                line_count: snapshot.len(),
                total_quantity: snapshot.total_quantity(),
            },
            version: snapshot.version(),
        }
    }
}

/// Gets the current cart contents.
pub fn get_cart(cart: &CartReader) -> CartResponse {
    debug!("get_cart command");
    CartResponse::from(&cart.snapshot())
}

/// Adds one unit of a product.
///
/// ## Behavior
/// - Product already in cart: quantity increases by one
/// - Product not in cart: appended with quantity 1
pub fn add_to_cart(cart: &CartDispatcher, product: ProductDescriptor) -> CartResponse {
    debug!(product_id = %product.id, "add_to_cart command");
    CartResponse::from(&cart.dispatch(CartAction::AddItem(product)))
}

/// Takes one unit off a product; the last unit removes the line.
pub fn decrement_cart_item(cart: &CartDispatcher, product_id: ProductId) -> CartResponse {
    debug!(product_id = %product_id, "decrement_cart_item command");
    CartResponse::from(&cart.dispatch(CartAction::decrement(product_id)))
}

/// Removes a product's line. Unknown products are ignored.
pub fn remove_from_cart(cart: &CartDispatcher, product_id: ProductId) -> CartResponse {
    debug!(product_id = %product_id, "remove_from_cart command");
    CartResponse::from(&cart.dispatch(CartAction::remove(product_id)))
}

/// Clears all items from the cart.
pub fn clear_cart(cart: &CartDispatcher) -> CartResponse {
    debug!("clear_cart command");
    CartResponse::from(&cart.dispatch(CartAction::ClearCart))
}

/// Dispatches an action received as JSON text.
///
/// ## Errors
/// Only text that is not JSON is an error. A JSON value that is not a known
/// action leaves the cart unchanged.
pub fn dispatch_json(cart: &CartDispatcher, json: &str) -> Result<CartResponse, ApiError> {
    let value: Value = serde_json::from_str(json)?;
    Ok(CartResponse::from(&cart.dispatch_value(value)))
}
