//! towndiff Service Library
//!
//! HTTP handlers, router and OpenAPI document for the town service.
//! This library is used by both the towndiff-service binary and integration tests.

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use towndiff::{TownService, TownStore};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Town service over a type-erased store.
pub type SharedTownService = TownService<Arc<dyn TownStore>>;

/// Application state shared across handlers.
pub struct AppState {
    /// Town service for CRUD and distance queries.
    pub town_service: SharedTownService,
}

impl AppState {
    /// Create state over the given store.
    pub fn new<S: TownStore + 'static>(store: S) -> Self {
        let store: Arc<dyn TownStore> = Arc::new(store);
        Self {
            town_service: TownService::new(store),
        }
    }
}

/// OpenAPI documentation for the towndiff service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Town Diff Service",
        version = "0.1.0",
        description = "Town records and great-circle distances between them.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        handlers::diff_towns,
        handlers::get_towns,
        handlers::save_town,
        handlers::update_town,
        handlers::delete_town,
        handlers::towns_geojson,
        handlers::health_check,
    ),
    components(
        schemas(
            handlers::TownBody,
            handlers::DiffResponse,
            handlers::ErrorResponse,
            handlers::HealthResponse,
        )
    ),
    tags(
        (name = "towns", description = "Town records and distances"),
        (name = "system", description = "System and health endpoints")
    )
)]
pub struct ApiDoc;

/// Build the application router.
///
/// Path segments after `/api/town/` share the `:name` parameter so the diff
/// and single-town routes can coexist.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route(
            "/api/town",
            get(handlers::get_towns).post(handlers::save_town),
        )
        .route("/api/town/:name/diff/:dest", get(handlers::diff_towns))
        .route(
            "/api/town/:name",
            patch(handlers::update_town).delete(handlers::delete_town),
        )
        .route("/api/towns.geojson", get(handlers::towns_geojson))
        .route("/health", get(handlers::health_check))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{DiffResponse, ErrorResponse, HealthResponse, TownBody, TownQuery};
