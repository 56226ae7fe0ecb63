//! MongoDB repository tests against a real server (requires Docker).
//!
//! Run with `cargo test -p domain_products -- --ignored`.

use domain_products::{
    CreateProduct, MongoProductRepository, ProductError, ProductService, UpdateProduct,
};
use futures::TryStreamExt;
use test_utils::assertions::{assert_price_eq, assert_some};
use test_utils::{TestDataBuilder, TestMongo};

async fn service(
    mongo: &TestMongo,
    test_name: &str,
) -> (ProductService<MongoProductRepository>, TestDataBuilder) {
    let builder = TestDataBuilder::from_test_name(test_name);
    let db = mongo.database(&builder.database_name());
    (ProductService::new(MongoProductRepository::new(&db)), builder)
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_create_then_get_round_trips() {
    let mongo = TestMongo::new().await;
    let (service, builder) = service(&mongo, "test_create_then_get_round_trips").await;

    let name = builder.name("product", "latte");
    let created = service
        .create_product(CreateProduct {
            name: name.clone(),
            price: builder.price(),
        })
        .await
        .unwrap();
    let id = assert_some(created.id.clone(), "created product id");

    let fetched = service.get_product(&id).await.unwrap();
    assert_eq!(fetched.name, name);
    assert_price_eq(fetched.price, builder.price(), "fetched price");
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_update_preserves_id_and_replaces_fields() {
    let mongo = TestMongo::new().await;
    let (service, _) = service(&mongo, "test_update_preserves_id_and_replaces_fields").await;

    let created = service
        .create_product(CreateProduct {
            name: "Big Latte".to_string(),
            price: 2.99,
        })
        .await
        .unwrap();
    let id = created.id.unwrap();

    let updated = service
        .update_product(
            &id,
            UpdateProduct {
                name: "Big Decaf".to_string(),
                price: 2.49,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id.as_deref(), Some(id.as_str()));
    let fetched = service.get_product(&id).await.unwrap();
    assert_eq!(fetched.name, "Big Decaf");
    assert_price_eq(fetched.price, 2.49, "updated price");

    let all: Vec<_> = service.list_products().await.unwrap().try_collect().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_update_missing_does_not_insert() {
    let mongo = TestMongo::new().await;
    let (service, _) = service(&mongo, "test_update_missing_does_not_insert").await;

    let result = service
        .update_product(
            "no-such-id",
            UpdateProduct {
                name: "Ghost".to_string(),
                price: 1.0,
            },
        )
        .await;

    assert!(matches!(result, Err(ProductError::NotFound(_))));
    let all: Vec<_> = service.list_products().await.unwrap().try_collect().await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_delete_removes_only_that_product() {
    let mongo = TestMongo::new().await;
    let (service, _) = service(&mongo, "test_delete_removes_only_that_product").await;

    let mut ids = Vec::new();
    for (name, price) in [("Big Latte", 2.99), ("Green Tea", 1.99)] {
        let product = service
            .create_product(CreateProduct {
                name: name.to_string(),
                price,
            })
            .await
            .unwrap();
        ids.push(product.id.unwrap());
    }

    service.delete_product(&ids[0]).await.unwrap();

    assert!(matches!(
        service.get_product(&ids[0]).await,
        Err(ProductError::NotFound(_))
    ));
    assert!(service.get_product(&ids[1]).await.is_ok());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_delete_all_empties_collection() {
    let mongo = TestMongo::new().await;
    let (service, _) = service(&mongo, "test_delete_all_empties_collection").await;

    for price in [1.0, 2.0, 3.0] {
        service
            .create_product(CreateProduct {
                name: "Espresso".to_string(),
                price,
            })
            .await
            .unwrap();
    }

    service.delete_all_products().await.unwrap();

    let all: Vec<_> = service.list_products().await.unwrap().try_collect().await.unwrap();
    assert!(all.is_empty());
}
