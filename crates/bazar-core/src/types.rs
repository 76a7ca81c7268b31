//! # Domain Types
//!
//! Product-facing types that flow into the cart.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────┐   │
//! │  │   ProductId     │   │ ProductDescriptor   │   │   ProductRef    │   │
//! │  │  ─────────────  │   │  ─────────────────  │   │  ─────────────  │   │
//! │  │  Numeric(i64)   │   │  id                 │   │  id             │   │
//! │  │  Text(String)   │   │  attributes (opaque)│   │                 │   │
//! │  └─────────────────┘   └─────────────────────┘   └─────────────────┘   │
//! │                                                                         │
//! │  ADD_ITEM carries a ProductDescriptor.                                  │
//! │  REMOVE_ITEM / DECREMENT_ITEM carry a ProductRef.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Opaque Attributes
//! Name, price and image reference travel with the product so the cart can be
//! rendered without another catalog lookup. The cart never reads them.

use std::fmt;

use serde::{de, Deserialize, Serialize};
use serde_json::{Map, Value};

/// Display metadata carried alongside a product (name, price, image, ...).
pub type Attributes = Map<String, Value>;

// =============================================================================
// Product Id
// =============================================================================

/// Opaque product identifier.
///
/// The REST backend hands out 64-bit integer ids, but the cart does not care:
/// textual ids are accepted too and each id is written back in the form it
/// arrived in. `1` and `"1"` are different products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Integer id as issued by the backend.
    Numeric(i64),

    /// Any other textual key.
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Numeric(id) => write!(f, "{}", id),
            ProductId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        ProductId::Numeric(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId::Text(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        ProductId::Text(id)
    }
}

// =============================================================================
// Product Descriptor
// =============================================================================

/// A product as the catalog pages hand it to the cart.
///
/// ## Wire Form
/// The browser sends products flat, so every key other than `id` lands in
/// `attributes`:
/// ```json
/// { "id": 7, "name": "Mate cup", "price": 12.5, "imageUrl": "/img/7.png" }
/// ```
///
/// `productId` is read as the key only when `id` is absent. When both are
/// sent, `id` wins and `productId` stays in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Attributes")]
pub struct ProductDescriptor {
    /// Product key.
    pub id: ProductId,

    /// Everything else about the product.
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl ProductDescriptor {
    /// Creates a descriptor with no attributes.
    pub fn new(id: impl Into<ProductId>) -> Self {
        ProductDescriptor {
            id: id.into(),
            attributes: Attributes::new(),
        }
    }

    /// Adds one display attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

impl TryFrom<Attributes> for ProductDescriptor {
    type Error = serde_json::Error;

    fn try_from(mut attributes: Attributes) -> Result<Self, Self::Error> {
        let id = take_id(&mut attributes)?;
        Ok(ProductDescriptor { id, attributes })
    }
}

/// Removes the product key from a flat object, `id` first, then `productId`.
fn take_id(object: &mut Attributes) -> Result<ProductId, serde_json::Error> {
    let value = match object.remove("id") {
        Some(value) => value,
        None => object
            .remove("productId")
            .ok_or_else(|| <serde_json::Error as de::Error>::missing_field("id"))?,
    };
    serde_json::from_value(value)
}

// =============================================================================
// Product Ref
// =============================================================================

/// Payload of actions that only need to name a product.
///
/// Accepts `{ "id": .. }` or `{ "productId": .. }` (`id` wins when both are
/// present); extra keys are ignored so a full product object can be passed
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Attributes")]
pub struct ProductRef {
    pub id: ProductId,
}

impl ProductRef {
    pub fn new(id: impl Into<ProductId>) -> Self {
        ProductRef { id: id.into() }
    }
}

impl TryFrom<Attributes> for ProductRef {
    type Error = serde_json::Error;

    fn try_from(mut object: Attributes) -> Result<Self, Self::Error> {
        Ok(ProductRef {
            id: take_id(&mut object)?,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
