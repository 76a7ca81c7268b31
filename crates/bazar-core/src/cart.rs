//! # Cart
//!
//! The cart value and its reducer.
//!
//! ## Transition Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Action           Line present?     Effect                              │
//! │  ──────────────   ──────────────    ─────────────────────────────────   │
//! │  ADD_ITEM         yes               quantity += 1 (attributes kept)     │
//! │                   no                push { quantity: 1 } at the end     │
//! │  REMOVE_ITEM      yes               line removed                        │
//! │                   no                no-op                               │
//! │  DECREMENT_ITEM   yes, qty > 1      quantity -= 1                       │
//! │                   yes, qty == 1     line removed                        │
//! │                   no                no-op                               │
//! │  CLEAR_CART       -                 empty cart                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per product id
//! - Every line has `quantity >= 1`
//! - Lines keep insertion order
//!
//! Lines can only be built by the reducer, so no caller can break these.

use serde::Serialize;
use ts_rs::TS;

use crate::action::CartAction;
use crate::types::{Attributes, ProductDescriptor, ProductId};

// =============================================================================
// Cart Line
// =============================================================================

/// One product's entry in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    #[ts(type = "number | string")]
    product_id: ProductId,

    /// Attributes from the first ADD_ITEM of this product.
    #[ts(type = "Record<string, unknown>")]
    attributes: Attributes,

    quantity: u32,
}

impl CartLine {
    fn from_descriptor(product: &ProductDescriptor) -> Self {
        CartLine {
            product_id: product.id.clone(),
            attributes: product.attributes.clone(),
            quantity: 1,
        }
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Always at least 1.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Ordered, duplicate-free list of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Builds a cart by replaying actions from empty.
    pub fn replay<'a, I>(actions: I) -> Self
    where
        I: IntoIterator<Item = &'a CartAction>,
    {
        actions
            .into_iter()
            .fold(Cart::new(), |cart, action| cart.apply(action))
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartLine> {
        self.lines.iter()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product_id == id)
    }

    /// Quantity of a product, 0 when it has no line.
    pub fn quantity_of(&self, id: &ProductId) -> u32 {
        self.get(id).map_or(0, CartLine::quantity)
    }

    /// Sum of all quantities (what the navigation badge shows).
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.lines.iter().position(|line| &line.product_id == id)
    }

    /// Applies an action, returning the next cart.
    ///
    /// This is the total form of [`Cart::reduce`]: no-op actions yield an
    /// equal cart.
    pub fn apply(&self, action: &CartAction) -> Cart {
        self.reduce(action).unwrap_or_else(|| self.clone())
    }

    /// Pure transition function.
    ///
    /// Returns `None` when the action leaves this cart unchanged, so callers
    /// can skip publishing a new snapshot. `self` is never modified.
    pub fn reduce(&self, action: &CartAction) -> Option<Cart> {
        match action {
            CartAction::AddItem(product) => self.with_added(product),
            CartAction::RemoveItem(target) => {
                let index = self.position(&target.id)?;
                let mut lines = self.lines.clone();
                lines.remove(index);
                Some(Cart { lines })
            }
            CartAction::DecrementItem(target) => {
                let index = self.position(&target.id)?;
                let mut lines = self.lines.clone();
                let line = lines.get_mut(index)?;
                if line.quantity > 1 {
                    line.quantity -= 1;
                } else {
                    lines.remove(index);
                }
                Some(Cart { lines })
            }
            CartAction::ClearCart => {
                if self.is_empty() {
                    None
                } else {
                    Some(Cart::new())
                }
            }
        }
    }

    fn with_added(&self, product: &ProductDescriptor) -> Option<Cart> {
        let mut lines = self.lines.clone();
        match self.position(&product.id) {
            Some(index) => {
                let line = lines.get_mut(index)?;
                // Saturated lines stay as they are.
                line.quantity = line.quantity.checked_add(1)?;
            }
            None => lines.push(CartLine::from_descriptor(product)),
        }
        Some(Cart { lines })
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
