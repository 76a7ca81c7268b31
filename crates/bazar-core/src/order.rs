//! # Order Requests
//!
//! Translation of a cart into the body of the backend's order-creation
//! endpoint. The cart never sends it; checkout code reads a snapshot and
//! posts this.
//!
//! ```json
//! { "items": [ { "productId": 1, "quantity": 2 } ] }
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, CartLine};
use crate::types::ProductId;

/// One ordered product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderItemRequest {
    #[ts(type = "number | string")]
    pub product_id: ProductId,
    pub quantity: u32,
}

impl From<&CartLine> for OrderItemRequest {
    fn from(line: &CartLine) -> Self {
        OrderItemRequest {
            product_id: line.product_id().clone(),
            quantity: line.quantity(),
        }
    }
}

/// Order-creation request body, items in cart order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderRequest {
    pub items: Vec<OrderItemRequest>,
}

impl OrderRequest {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

impl From<&Cart> for OrderRequest {
    fn from(cart: &Cart) -> Self {
        OrderRequest {
            items: cart.iter().map(OrderItemRequest::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CartAction, ProductDescriptor};
    use serde_json::json;

    #[test]
    fn test_order_request_from_cart() {
        let cart = Cart::replay(&[
            CartAction::add(ProductDescriptor::new(2).with_attribute("price", 5)),
            CartAction::add(ProductDescriptor::new(1)),
            CartAction::add(ProductDescriptor::new(2)),
        ]);

        let request = OrderRequest::from(&cart);

        assert_eq!(request.total_quantity(), 3);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "items": [
                    { "productId": 2, "quantity": 2 },
                    { "productId": 1, "quantity": 1 }
                ]
            })
        );
    }

    #[test]
    fn test_empty_cart_gives_empty_request() {
        assert!(OrderRequest::from(&Cart::new()).is_empty());
    }
}
