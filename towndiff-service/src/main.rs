//! towndiff Service - HTTP microservice for town records and distances.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `TOWNDIFF_PORT` | HTTP server port | 8080 |
//! | `TOWNDIFF_SEED_FILE` | JSON or GeoJSON file of towns loaded at startup | None |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `GET /api/town/{home}/diff/{dest}` - Distance between two towns
//! - `GET /api/town?name=X&id=N` - List towns
//! - `POST /api/town` - Create a town
//! - `PATCH /api/town/{name}` - Update a town
//! - `DELETE /api/town/{name}` - Delete a town
//! - `GET /api/towns.geojson` - All towns as GeoJSON
//! - `GET /health` - Health check
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use towndiff::TownServiceBuilder;
use towndiff_service::{app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "towndiff_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = std::env::var("TOWNDIFF_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    // The library handles TOWNDIFF_SEED_FILE
    let builder = TownServiceBuilder::from_env();
    match builder.seed_path() {
        Some(path) => tracing::info!(seed_file = %path.display(), "Seeding town store"),
        None => tracing::warn!("TOWNDIFF_SEED_FILE not set, starting with an empty store"),
    }
    let town_service = builder.build()?;
    let store = town_service.into_store();

    tracing::info!(towns = store.len()?, port = port, "Starting towndiff service");

    let state = Arc::new(AppState::new(store));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
