//! # State Module
//!
//! Session-scoped state for the storefront.
//!
//! ## Why Multiple State Types?
//! Each command takes only the state it needs, so a navigation badge gets a
//! `CartReader` and never a way to mutate the cart.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Storefront::new(config)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  CartStore   │  │ SessionState │  │ StorefrontConfig │              │
//! │  │              │  │              │  │                  │              │
//! │  │  RwLock<     │  │  RwLock<     │  │  api_base_url    │              │
//! │  │   Snapshot>  │  │   Option<..>>│  │  store_name      │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │         │                                                               │
//! │         ├──► CartDispatcher (write)                                     │
//! │         └──► CartReader     (read / subscribe / watch)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod session;

pub use cart::{CartDispatcher, CartReader, CartSnapshot, CartStore, SubscriptionId};
pub use config::StorefrontConfig;
pub use session::{AuthSession, SessionState, ADMIN_ROLE};
