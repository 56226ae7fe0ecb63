//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use mongodb::{
    Collection, Database,
    bson::{doc, oid::ObjectId},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::Product;
use crate::repository::{ProductRepository, ProductStream};

/// Stored shape of a product. The id is kept as a hex string in `_id` so it
/// round-trips through the API unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ProductDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    price: f64,
}

impl ProductDocument {
    /// Generates an ObjectId-style hex id when the product has none.
    fn from_product(product: Product) -> Self {
        Self {
            id: product.id.unwrap_or_else(|| ObjectId::new().to_hex()),
            name: product.name,
            price: product.price,
        }
    }
}

impl From<ProductDocument> for Product {
    fn from(document: ProductDocument) -> Self {
        Product {
            id: Some(document.id),
            name: document.name,
            price: document.price,
        }
    }
}

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    /// Repository over the `products` collection of `db`
    ///
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let repo = MongoProductRepository::new(&client.database("shop"));
    /// ```
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, "products")
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<ProductDocument>(collection_name),
        }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> ProductResult<ProductStream> {
        let cursor = self.collection.find(doc! {}).await?;

        Ok(cursor
            .map_ok(Product::from)
            .map_err(ProductError::from)
            .boxed())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> ProductResult<Option<Product>> {
        let document = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(document.map(Product::from))
    }

    #[instrument(skip(self, product), fields(product_name = %product.name))]
    async fn save(&self, product: Product) -> ProductResult<Product> {
        let document = ProductDocument::from_product(product);

        self.collection
            .replace_one(doc! { "_id": &document.id }, &document)
            .upsert(true)
            .await?;

        tracing::info!(product_id = %document.id, "Product saved");
        Ok(document.into())
    }

    #[instrument(skip(self, product), fields(product_id = ?product.id))]
    async fn delete(&self, product: Product) -> ProductResult<()> {
        let Some(id) = product.id else {
            return Ok(());
        };

        let result = self.collection.delete_one(doc! { "_id": &id }).await?;
        tracing::info!(product_id = %id, deleted = result.deleted_count, "Product deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> ProductResult<()> {
        let result = self.collection.delete_many(doc! {}).await?;
        tracing::info!(deleted = result.deleted_count, "All products deleted");
        Ok(())
    }
}
