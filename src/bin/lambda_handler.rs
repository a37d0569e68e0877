//! AWS Lambda handler for the quoting API
//!
//! Accepts quote and collection requests via JSON and returns the computed
//! figures, the collection cache statistics and the cache-clear count.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use std::sync::Arc;

use cotizador_system::periods::loader;
use cotizador_system::render::{SvgChartRenderer, TmpfilesClient};
use cotizador_system::{
    CacheRegistry, CollectionParams, CollectionService, PeriodTable, QuoteParams, QuoteService,
};
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde::{Deserialize, Serialize};

/// Directory the rendered collection images are written to
const IMAGE_OUTPUT_DIR: &str = "/tmp/collection-images";

/// Request body for POST /quotes
#[derive(Debug, Deserialize)]
struct QuoteRequest {
    product: String,
    params: QuoteParams,
}

/// Request body for POST /quotes/collection
#[derive(Debug, Deserialize)]
struct CollectionRequest {
    product: String,
    params: CollectionParams,

    /// Whether to render the summary image (default: true)
    #[serde(default = "default_true")]
    generate_image: bool,

    /// Whether to consult and fill the collection cache (default: true)
    #[serde(default = "default_true")]
    use_cache: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
struct ClearCacheResponse {
    removed_count: usize,
}

/// Service state shared across invocations
struct AppState {
    quotes: QuoteService,
    collections: CollectionService,
}

fn error_response(status: u16, message: &str) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(format!(r#"{{"error":"{}"}}"#, message)))
        .unwrap()
}

fn json_response<T: Serialize>(status: u16, body: &T) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// Lambda handler function
async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)
            .unwrap());
    }

    let method = event.method().as_str().to_string();
    let path = event.uri().path().to_string();

    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    match (method.as_str(), path.as_str()) {
        ("POST", "/quotes") => {
            let request: QuoteRequest = match serde_json::from_str(&body_str) {
                Ok(r) => r,
                Err(e) => return Ok(error_response(400, &format!("Invalid JSON: {}", e))),
            };

            match state.quotes.create(&request.product, request.params) {
                Ok(quote) => Ok(json_response(201, &quote)),
                Err(err) => Ok(error_response(422, &err.to_string())),
            }
        }

        ("POST", "/quotes/collection") => {
            let request: CollectionRequest = match serde_json::from_str(&body_str) {
                Ok(r) => r,
                Err(e) => return Ok(error_response(400, &format!("Invalid JSON: {}", e))),
            };

            // Rendering and upload are blocking I/O; keep them off the
            // async worker.
            let state = Arc::clone(&state);
            let result = tokio::task::spawn_blocking(move || {
                state.collections.create_collection(
                    &request.product,
                    &request.params,
                    request.generate_image,
                    request.use_cache,
                )
            })
            .await?;

            match result {
                Ok(collection) => Ok(json_response(200, &collection)),
                Err(err) => Ok(error_response(422, &err.to_string())),
            }
        }

        ("POST", "/cache/clear") => {
            let removed_count = state.collections.clear_cache();
            Ok(json_response(200, &ClearCacheResponse { removed_count }))
        }

        ("GET", "/cache/stats") => Ok(json_response(200, &state.collections.cache_stats())),

        _ => Ok(error_response(404, "Not found")),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let table = loader::load_default_periods().unwrap_or_else(|err| {
        log::warn!(
            "period configuration not loaded ({}), using built-in catalogue",
            err
        );
        PeriodTable::default_table()
    });

    let renderer = SvgChartRenderer::new(IMAGE_OUTPUT_DIR).with_uploader(TmpfilesClient::new());
    let collections = CollectionService::new(Arc::new(table), Arc::new(CacheRegistry::new()))
        .with_renderer(Arc::new(renderer));

    let state = Arc::new(AppState {
        quotes: QuoteService::new(),
        collections,
    });

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
