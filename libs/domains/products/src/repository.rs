use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::ProductResult;
use crate::models::Product;

/// Lazily yielded products, in store order
pub type ProductStream = BoxStream<'static, ProductResult<Product>>;

/// Repository trait for Product persistence
///
/// Implementations can use different storage backends (MongoDB, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Stream every product. Items are fetched as the stream is polled.
    async fn find_all(&self) -> ProductResult<ProductStream>;

    async fn find_by_id(&self, id: &str) -> ProductResult<Option<Product>>;

    /// Insert a product without an id under a fresh id, or replace (upsert)
    /// the stored product with the same id. Returns the product with its id.
    async fn save(&self, product: Product) -> ProductResult<Product>;

    async fn delete(&self, product: Product) -> ProductResult<()>;

    async fn delete_all(&self) -> ProductResult<()>;
}
