//! Product Service - the operations behind each HTTP endpoint

use std::sync::Arc;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::repository::{ProductRepository, ProductStream};

/// Product operations over a [`ProductRepository`]
///
/// No validation happens here; names and prices are stored as given.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<ProductStream> {
        self.repository.find_all().await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> ProductResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        self.repository.save(input.into()).await
    }

    /// Overwrite name and price of an existing product. Nothing is written
    /// when `id` is unknown.
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: &str, input: UpdateProduct) -> ProductResult<Product> {
        let mut product = self.get_product(id).await?;
        product.apply_update(input);
        self.repository.save(product).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> ProductResult<()> {
        let product = self.get_product(id).await?;
        self.repository.delete(product).await
    }

    #[instrument(skip(self))]
    pub async fn delete_all_products(&self) -> ProductResult<()> {
        self.repository.delete_all().await
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
