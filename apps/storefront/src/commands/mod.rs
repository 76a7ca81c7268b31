//! # Commands Module
//!
//! All handlers exposed to the storefront views.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── cart.rs      ◄─── Cart manipulation
//! └── checkout.rs  ◄─── Order request building
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only reads the cart (navigation badge)
//! fn get_cart(cart: &CartReader)
//!
//! // Only writes the cart (product page button)
//! fn add_to_cart(cart: &CartDispatcher, product: ProductDescriptor)
//!
//! // Needs both session and cart
//! fn checkout_request(session: &SessionState, cart: &CartReader)
//! ```

pub mod cart;
pub mod checkout;
