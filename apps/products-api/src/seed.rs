//! Startup sample data

use domain_products::{CreateProduct, Product, ProductRepository, ProductResult, ProductService};
use futures::TryStreamExt;
use tracing::info;

/// Inserted on every start when `SEED_PRODUCTS` is enabled
pub const SAMPLE_PRODUCTS: [(&str, f64); 3] =
    [("Big Latte", 2.99), ("Big Decaf", 2.49), ("Green Tea", 1.99)];

/// Insert [`SAMPLE_PRODUCTS`], then log and return everything stored.
pub async fn seed_products<R: ProductRepository>(
    service: &ProductService<R>,
) -> ProductResult<Vec<Product>> {
    for (name, price) in SAMPLE_PRODUCTS {
        service
            .create_product(CreateProduct {
                name: name.to_string(),
                price,
            })
            .await?;
    }

    let products: Vec<Product> = service.list_products().await?.try_collect().await?;
    for product in &products {
        info!(
            product_id = product.id.as_deref().unwrap_or_default(),
            name = %product.name,
            price = product.price,
            "Stored product"
        );
    }
    info!(count = products.len(), "Sample products seeded");

    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryRepository;

    #[tokio::test]
    async fn test_seed_inserts_sample_products() {
        let service = ProductService::new(MemoryRepository::default());

        let products = seed_products(&service).await.unwrap();

        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Big Latte", "Big Decaf", "Green Tea"]);
        assert!(products.iter().all(|p| p.id.is_some()));
    }

    #[tokio::test]
    async fn test_seed_logs_existing_products_too() {
        let service = ProductService::new(MemoryRepository::default());
        service
            .create_product(CreateProduct {
                name: "Mocha".to_string(),
                price: 3.5,
            })
            .await
            .unwrap();

        let products = seed_products(&service).await.unwrap();

        assert_eq!(products.len(), 4);
    }
}
