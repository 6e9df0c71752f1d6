// Product Registry - Web Server
// REST API over a single shared ProductStore

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use product_registry::{logging, Config, ProductId, ProductInput, ProductStore, SharedStore};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
struct AppState {
    store: SharedStore,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<Value> {
    fn error(message: String) -> Self {
        Self {
            success: false,
            data: Value::Null,
            error: Some(message),
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/products - Current snapshot, insertion order
async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.store.lock().unwrap().list();

    (StatusCode::OK, Json(ApiResponse::ok(snapshot.to_vec())))
}

/// GET /api/products/:id - Single product
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> impl IntoResponse {
    let product = state.store.lock().unwrap().get(id);

    match product {
        Some(product) => (StatusCode::OK, Json(ApiResponse::ok(product))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Value>::error(format!("product {} not found", id))),
        )
            .into_response(),
    }
}

/// POST /api/products - Add a product
async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> impl IntoResponse {
    let result = state.store.lock().unwrap().try_add(
        &input.name,
        &input.price.as_raw(),
        &input.category,
    );

    match result {
        Ok(product) => {
            info!(id = product.id, "product created");
            (StatusCode::CREATED, Json(ApiResponse::ok(product))).into_response()
        }
        Err(e) => {
            warn!(field = e.field(), "rejected product: {}", e);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::<Value>::error(e.to_string())),
            )
                .into_response()
        }
    }
}

/// DELETE /api/products/:id - Remove a product (unknown ids succeed too)
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> impl IntoResponse {
    state.store.lock().unwrap().remove(id);

    StatusCode::NO_CONTENT
}

fn router(store: SharedStore) -> Router {
    let state = AppState { store };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/products", get(list_products).post(create_product))
        .route("/products/:id", get(get_product).delete(delete_product))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_filter)?;

    println!("🌐 Product Registry - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let app = router(ProductStore::shared());

    // Start server
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    println!("\n🚀 Server running on http://{}", config.bind_addr);
    println!("   API: http://{}/api/products", config.bind_addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("server failed")?;

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::post("/api/products")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(ProductStore::shared());

        let (status, body) = send(&app, get("/api/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let app = router(ProductStore::shared());

        let (status, body) = send(
            &app,
            post_json(r#"{"name":" Chair ","price":"25,00","category":"Furniture"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["id"], 1);
        assert_eq!(body["data"]["name"], "Chair");

        let (status, body) = send(&app, get("/api/products")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"],
            serde_json::json!([{"id": 1, "name": "Chair", "price": 25.0, "category": "Furniture"}])
        );
    }

    #[tokio::test]
    async fn test_create_invalid_leaves_store_unchanged() {
        let store = ProductStore::shared();
        let app = router(store.clone());

        let (status, body) = send(
            &app,
            post_json(r#"{"name":"Pen","price":0,"category":"Office"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("price"));
        assert!(store.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let store = ProductStore::shared();
        store.lock().unwrap().add("Pen", "1.5", "Office");
        let app = router(store.clone());

        let (status, body) = send(&app, get("/api/products/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["price"], 1.5);

        let delete = || Request::delete("/api/products/1").body(Body::empty()).unwrap();
        let (status, _) = send(&app, delete()).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        // Second delete is still a success
        let (status, _) = send(&app, delete()).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, get("/api/products/1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(store.lock().unwrap().is_empty());
    }
}
