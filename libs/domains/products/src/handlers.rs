use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use axum_helpers::errors::responses::InternalServerErrorResponse;
use futures::{Stream, StreamExt, stream};
use std::time::Duration;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::events::{EVENT_INTERVAL, spawn_ticker};
use crate::models::{CreateProduct, Product, ProductEvent, UpdateProduct};
use crate::repository::{ProductRepository, ProductStream};
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        delete_all_products,
        product_events,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(Product, CreateProduct, UpdateProduct, ProductEvent),
        responses(InternalServerErrorResponse)
    ),
    tags(
        (name = "Products", description = "Product management endpoints (MongoDB)")
    )
)]
pub struct ApiDoc;

/// Shared handler state
pub struct ProductsState<R: ProductRepository> {
    pub service: ProductService<R>,
    pub event_interval: Duration,
}

impl<R: ProductRepository> Clone for ProductsState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            event_interval: self.event_interval,
        }
    }
}

/// Products router, to be nested under `/products`
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    router_with_event_interval(service, EVENT_INTERVAL)
}

/// [`router`] with a custom spacing for `/events`
pub fn router_with_event_interval<R: ProductRepository + 'static>(
    service: ProductService<R>,
    event_interval: Duration,
) -> Router {
    let state = ProductsState {
        service,
        event_interval,
    };

    Router::new()
        .route(
            "/",
            get(list_products).post(create_product).delete(delete_all_products),
        )
        .route("/events", get(product_events))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(state)
}

/// Encode products as one JSON array, writing each element as it arrives.
///
/// A store error after the first chunk has been sent aborts the body.
fn json_array_body(products: ProductStream) -> Body {
    let mut first = true;
    let elements = products.map(move |item| -> ProductResult<Bytes> {
        let product = item?;
        let mut chunk = if first { Vec::new() } else { b",".to_vec() };
        first = false;
        serde_json::to_writer(&mut chunk, &product)?;
        Ok(Bytes::from(chunk))
    });

    let body = stream::once(async { Ok(Bytes::from_static(b"[")) })
        .chain(elements.inspect(|item| {
            if let Err(e) = item {
                tracing::error!(error = %e, "Product stream failed mid-response");
            }
        }))
        .chain(stream::once(async { Ok(Bytes::from_static(b"]")) }));

    Body::from_stream(body)
}

/// List all products
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    responses(
        (status = 200, description = "All products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
) -> ProductResult<Response> {
    let products = state.service.list_products().await?;
    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        json_array_body(products),
    )
        .into_response())
}

/// Create a product. The store assigns its id.
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    payload: Result<Json<CreateProduct>, JsonRejection>,
) -> ProductResult<impl IntoResponse> {
    let Json(input) = payload?;
    let product = state.service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Delete every product
#[utoipa::path(
    delete,
    path = "",
    tag = "Products",
    responses(
        (status = 200, description = "All products deleted"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_all_products<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
) -> ProductResult<StatusCode> {
    state.service.delete_all_products().await?;
    Ok(StatusCode::OK)
}

/// Stream one `ProductEvent` per second until the client disconnects
#[utoipa::path(
    get,
    path = "/events",
    tag = "Products",
    responses(
        (status = 200, description = "Server-sent events, one JSON ProductEvent per `data:` line",
         content_type = "text/event-stream", body = ProductEvent)
    )
)]
async fn product_events<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let (events, _ticker) = spawn_ticker(state.event_interval);
    tracing::debug!("Event stream opened");

    Sse::new(events.map(|event| Event::default().json_data(event)))
        .keep_alive(KeepAlive::default())
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "Product not found, empty body"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    Path(id): Path<String>,
) -> ProductResult<Json<Product>> {
    let product = state.service.get_product(&id).await?;
    Ok(Json(product))
}

/// Replace name and price of a product. The path id wins over any body id.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 404, description = "Product not found, empty body"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProduct>, JsonRejection>,
) -> ProductResult<Json<Product>> {
    let Json(input) = payload?;
    let product = state.service.update_product(&id, input).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product not found, empty body"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    Path(id): Path<String>,
) -> ProductResult<StatusCode> {
    state.service.delete_product(&id).await?;
    Ok(StatusCode::OK)
}
