//! # bazar-core: Pure Cart Logic for the Bazar Storefront
//!
//! This crate is the **heart** of the storefront cart. It holds the cart
//! value and its reducer as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bazar Storefront                                 │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser UI                                   │   │
//! │  │    Catalog ──► Product ──► Cart page ──► Checkout               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ actions / snapshots                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 storefront (CartStore, commands)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bazar-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  action   │  │   cart    │  │   order   │  │   │
//! │  │   │ ProductId │  │CartAction │  │   Cart    │  │OrderReq.  │  │   │
//! │  │   │Descriptor │  │ RawAction │  │ CartLine  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product ids and descriptors
//! - [`action`] - The `CartAction` sum type and raw envelope decoding
//! - [`cart`] - `Cart`, `CartLine` and the reducer
//! - [`order`] - Cart to order-request translation
//! - [`error`] - Action decode errors
//!
//! ## Example Usage
//!
//! ```rust
//! use bazar_core::{Cart, CartAction, ProductDescriptor, ProductId};
//!
//! let mate = ProductDescriptor::new(1).with_attribute("name", "Mate cup");
//!
//! let cart = Cart::new()
//!     .apply(&CartAction::add(mate.clone()))
//!     .apply(&CartAction::add(mate))
//!     .apply(&CartAction::decrement(1));
//!
//! assert_eq!(cart.quantity_of(&ProductId::from(1)), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod action;
pub mod cart;
pub mod error;
pub mod order;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use action::{CartAction, RawAction};
pub use cart::{Cart, CartLine};
pub use error::{ActionError, ActionResult};
pub use order::{OrderItemRequest, OrderRequest};
pub use types::{Attributes, ProductDescriptor, ProductId, ProductRef};
