use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Label carried by every [`ProductEvent`]
pub const PRODUCT_EVENT_LABEL: &str = "Product Event";

/// A product in the catalogue
///
/// `id` is assigned by the store; it is absent until the product is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "665f1c2e8a4b2d3f9c0e1a27")]
    pub id: Option<String>,
    #[schema(example = "Big Latte")]
    pub name: String,
    #[schema(example = 2.99)]
    pub price: f64,
}

impl Product {
    /// An unsaved product
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
        }
    }

    /// Replace name and price, keeping the id.
    pub fn apply_update(&mut self, update: UpdateProduct) {
        self.name = update.name;
        self.price = update.price;
    }
}

/// Request body for `POST /products`. An `id` in the body is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateProduct {
    #[schema(example = "Green Tea")]
    pub name: String,
    #[schema(example = 1.99)]
    pub price: f64,
}

impl From<CreateProduct> for Product {
    fn from(input: CreateProduct) -> Self {
        Product::new(input.name, input.price)
    }
}

/// Request body for `PUT /products/{id}`. The path id always wins over any
/// `id` in the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpdateProduct {
    #[schema(example = "Big Decaf")]
    pub name: String,
    #[schema(example = 2.49)]
    pub price: f64,
}

/// Synthetic event emitted on `/products/events`. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductEvent {
    pub sequence: u64,
    #[schema(example = "Product Event")]
    pub label: String,
}

impl ProductEvent {
    pub fn new(sequence: u64) -> Self {
        Self {
            sequence,
            label: PRODUCT_EVENT_LABEL.to_string(),
        }
    }
}
