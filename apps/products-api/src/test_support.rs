//! In-process repository for router and startup tests.

use async_trait::async_trait;
use domain_products::{Product, ProductRepository, ProductResult, ProductStream};
use futures::{stream, StreamExt};
use std::sync::Mutex;

/// Products in insertion order; ids are sequential numbers.
#[derive(Default)]
pub struct MemoryRepository {
    products: Mutex<Vec<Product>>,
    next_id: Mutex<u64>,
}

#[async_trait]
impl ProductRepository for MemoryRepository {
    async fn find_all(&self) -> ProductResult<ProductStream> {
        let products = self.products.lock().unwrap().clone();
        Ok(stream::iter(products.into_iter().map(Ok)).boxed())
    }

    async fn find_by_id(&self, id: &str) -> ProductResult<Option<Product>> {
        let products = self.products.lock().unwrap();
        Ok(products
            .iter()
            .find(|p| p.id.as_deref() == Some(id))
            .cloned())
    }

    async fn save(&self, mut product: Product) -> ProductResult<Product> {
        let id = match product.id.clone() {
            Some(id) => id,
            None => {
                let mut next_id = self.next_id.lock().unwrap();
                *next_id += 1;
                next_id.to_string()
            }
        };
        product.id = Some(id);

        let mut products = self.products.lock().unwrap();
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product.clone(),
            None => products.push(product.clone()),
        }
        Ok(product)
    }

    async fn delete(&self, product: Product) -> ProductResult<()> {
        self.products.lock().unwrap().retain(|p| p.id != product.id);
        Ok(())
    }

    async fn delete_all(&self) -> ProductResult<()> {
        self.products.lock().unwrap().clear();
        Ok(())
    }
}
