//! # Checkout Commands
//!
//! Turns the cart into the order-creation request body. Posting it is the
//! HTTP wrapper's job; the cart is left untouched until the caller clears it
//! after a successful order.

use bazar_core::OrderRequest;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{CartReader, SessionState};

/// Builds the order request for the current cart.
///
/// ## Errors
/// - `UNAUTHORIZED` when nobody is logged in
/// - `CART_ERROR` when the cart is empty
pub fn checkout_request(
    session: &SessionState,
    cart: &CartReader,
) -> Result<OrderRequest, ApiError> {
    debug!("checkout_request command");

    if !session.is_authenticated() {
        return Err(ApiError::unauthorized(
            "You need to log in before placing an order",
        ));
    }

    let snapshot = cart.snapshot();
    if snapshot.is_empty() {
        return Err(ApiError::cart("Cart is empty"));
    }

    let request = OrderRequest::from(snapshot.cart());
    info!(
        version = snapshot.version(),
        items = request.items.len(),
        quantity = request.total_quantity(),
        "Order request built"
    );
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::CartStore;
    use bazar_core::{CartAction, ProductDescriptor, ProductId};

    #[test]
    fn test_requires_login() {
        let store = CartStore::new();
        store.dispatch(CartAction::add(ProductDescriptor::new(1)));

        let err = checkout_request(&SessionState::new(), &store.reader()).unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[test]
    fn test_rejects_empty_cart() {
        let session = SessionState::new();
        session.login("tok", "USER");

        let err = checkout_request(&session, &CartStore::new().reader()).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[test]
    fn test_builds_request_in_cart_order() {
        let store = CartStore::new();
        let session = SessionState::new();
        session.login("tok", "USER");

        store.dispatch(CartAction::add(ProductDescriptor::new(2)));
        store.dispatch(CartAction::add(ProductDescriptor::new(1)));
        store.dispatch(CartAction::add(ProductDescriptor::new(2)));

        let request = checkout_request(&session, &store.reader()).unwrap();
        let items: Vec<_> = request
            .items
            .iter()
            .map(|item| (item.product_id.clone(), item.quantity))
            .collect();
        assert_eq!(items, vec![(ProductId::from(2), 2), (ProductId::from(1), 1)]);

        // Building the request does not touch the cart.
        assert_eq!(store.snapshot().version(), 3);
    }
}
