//! # Bazar Storefront Library
//!
//! Session-level wiring for the storefront: one cart store, one session and
//! one configuration per browsing session, handed to views explicitly.
//!
//! ## Module Organization
//! ```text
//! bazar_storefront/
//! ├── lib.rs          ◄─── You are here (Storefront setup, tracing)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── CartStore, snapshots, capabilities
//! │   ├── session.rs  ◄─── Login state, logout clears cart
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   └── checkout.rs ◄─── Order request building
//! ├── console.rs      ◄─── Line protocol of the bazar-cart binary
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Explicit Dependency Passing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Storefront::new(config)                                                │
//! │        │                                                                │
//! │        ├──► cart_reader()      ──► navigation badge, cart page          │
//! │        ├──► cart_dispatcher()  ──► product cards, cart page buttons     │
//! │        ├──► session()          ──► login page, navbar                   │
//! │        └──► config()           ──► checkout (API base URL)              │
//! │                                                                         │
//! │  No global lookup: a view only sees what it was handed.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod console;
pub mod error;
pub mod state;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use state::{CartDispatcher, CartReader, CartStore, SessionState, StorefrontConfig};

/// Everything one browsing session owns.
#[derive(Debug, Clone)]
pub struct Storefront {
    config: Arc<StorefrontConfig>,
    cart: CartStore,
    session: Arc<SessionState>,
}

impl Storefront {
    /// Builds the session state with an empty cart.
    pub fn new(config: StorefrontConfig) -> Self {
        let cart = CartStore::new();
        info!(
            store_id = %cart.id(),
            store_name = %config.store_name,
            api = %config.api_base_url,
            "Storefront session initialized"
        );

        Storefront {
            config: Arc::new(config),
            cart,
            session: Arc::new(SessionState::new()),
        }
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn cart_dispatcher(&self) -> CartDispatcher {
        self.cart.dispatcher()
    }

    pub fn cart_reader(&self) -> CartReader {
        self.cart.reader()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Logs out and resets the cart.
    pub fn logout(&self) {
        self.session.logout(&self.cart.dispatcher());
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bazar_storefront=trace` - Show trace for this crate only
/// - Default: `config.log_filter`
///
/// Logs go to stderr so stdout stays machine-readable.
///
/// ## Errors
/// Fails when a global subscriber is already installed.
pub fn init_tracing(
    config: &StorefrontConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazar_core::{CartAction, ProductDescriptor};

    #[test]
    fn test_handles_share_one_cart() {
        let storefront = Storefront::new(StorefrontConfig::default());
        let dispatcher = storefront.cart_dispatcher();
        let reader = storefront.clone().cart_reader();

        dispatcher.dispatch(CartAction::add(ProductDescriptor::new(1)));
        assert_eq!(reader.snapshot().total_quantity(), 1);
    }

    #[test]
    fn test_logout_resets_cart() {
        let storefront = Storefront::new(StorefrontConfig::default());
        storefront.session().login("tok", "USER");
        storefront
            .cart_dispatcher()
            .dispatch(CartAction::add(ProductDescriptor::new(1)));

        storefront.logout();

        assert!(!storefront.session().is_authenticated());
        assert!(storefront.cart_reader().snapshot().is_empty());
    }

    #[test]
    fn test_init_tracing_reports_second_install() {
        let config = StorefrontConfig::default();
        // Only the first install in this process can succeed.
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }

    #[test]
    fn test_sessions_are_independent() {
        let first = Storefront::new(StorefrontConfig::default());
        let second = Storefront::new(StorefrontConfig::default());

        first
            .cart_dispatcher()
            .dispatch(CartAction::add(ProductDescriptor::new(1)));
        assert!(second.cart_reader().snapshot().is_empty());
    }
}
