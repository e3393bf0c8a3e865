//! HTTP request handlers for the town service.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use towndiff::{Criteria, DiffResult, Town, TownError};
use utoipa::{IntoParams, ToSchema};

use crate::AppState;

/// Query parameters for town lookups.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TownQuery {
    /// Exact town name.
    pub name: Option<String>,
    /// Town identifier.
    pub id: Option<u64>,
}

impl From<TownQuery> for Criteria {
    fn from(query: TownQuery) -> Self {
        Criteria {
            name: query.name,
            id: query.id,
        }
    }
}

/// Town as sent and returned by the API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct TownBody {
    /// Store-assigned identifier (0 when not yet stored).
    #[serde(default)]
    pub id: u64,
    /// Town name, unique.
    #[serde(default)]
    pub name: String,
    /// Latitude in decimal degrees.
    #[serde(default)]
    pub lat: f64,
    /// Longitude in decimal degrees.
    #[serde(default)]
    pub lon: f64,
}

impl From<Town> for TownBody {
    fn from(town: Town) -> Self {
        Self {
            id: town.id,
            name: town.name,
            lat: town.lat,
            lon: town.lon,
        }
    }
}

impl From<TownBody> for Town {
    fn from(body: TownBody) -> Self {
        Town::new(body.name, body.lat, body.lon).with_id(body.id)
    }
}

/// Distance between two towns.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DiffResponse {
    /// Great-circle distance.
    pub distance: f64,
    /// Distance unit, always "kilometers".
    pub units: String,
}

impl From<DiffResult> for DiffResponse {
    fn from(diff: DiffResult) -> Self {
        Self {
            distance: diff.distance,
            units: diff.units,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Distance between two towns by name.
///
/// Responds `200` with `null` when either town does not exist.
#[utoipa::path(
    get,
    path = "/api/town/{home}/diff/{dest}",
    params(
        ("home" = String, Path, description = "Name of the home town"),
        ("dest" = String, Path, description = "Name of the destination town")
    ),
    responses(
        (status = 200, description = "Distance, or null if a town is missing", body = DiffResponse),
        (status = 503, description = "Store unavailable", body = ErrorResponse)
    ),
    tag = "towns"
)]
pub async fn diff_towns(
    State(state): State<Arc<AppState>>,
    Path((home, dest)): Path<(String, String)>,
) -> impl IntoResponse {
    match state.town_service.diff(&home, &dest) {
        Ok(Some(diff)) => {
            tracing::info!(
                home = %home,
                dest = %dest,
                distance = diff.distance,
                "Distance computed"
            );
            (StatusCode::OK, Json(Some(DiffResponse::from(diff)))).into_response()
        }
        Ok(None) => {
            tracing::info!(home = %home, dest = %dest, "Town not found, no distance");
            (StatusCode::OK, Json(None::<DiffResponse>)).into_response()
        }
        Err(e) => error_response("diff", e),
    }
}

/// List towns, optionally filtered.
///
/// Criteria come from the `name` and `id` query parameters, or from a JSON
/// town body when one is sent. No criteria lists every town.
#[utoipa::path(
    get,
    path = "/api/town",
    params(TownQuery),
    request_body = Option<TownBody>,
    responses(
        (status = 200, description = "Matching towns", body = Vec<TownBody>),
        (status = 400, description = "Malformed body", body = ErrorResponse)
    ),
    tag = "towns"
)]
pub async fn get_towns(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TownQuery>,
    body: Bytes,
) -> impl IntoResponse {
    let criteria = if body.iter().all(u8::is_ascii_whitespace) {
        Criteria::from(query)
    } else {
        match serde_json::from_slice::<TownBody>(&body) {
            Ok(partial) => Criteria::from(&Town::from(partial)),
            Err(e) => {
                return error_response(
                    "get",
                    TownError::Parse {
                        message: e.to_string(),
                    },
                )
            }
        }
    };

    tracing::debug!(name = ?criteria.name_filter(), id = ?criteria.id_filter(), "Town lookup");

    match state.town_service.get(&criteria) {
        Ok(towns) => {
            let towns: Vec<TownBody> = towns.into_iter().map(TownBody::from).collect();
            (StatusCode::OK, Json(towns)).into_response()
        }
        Err(e) => error_response("get", e),
    }
}

/// Create a town.
#[utoipa::path(
    post,
    path = "/api/town",
    request_body = TownBody,
    responses(
        (status = 200, description = "Stored town with its id", body = TownBody),
        (status = 409, description = "Name or id already exists, or no id left", body = ErrorResponse)
    ),
    tag = "towns"
)]
pub async fn save_town(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TownBody>,
) -> impl IntoResponse {
    match state.town_service.save(body.into()) {
        Ok(town) => {
            tracing::info!(id = town.id, name = %town.name, "Town saved");
            (StatusCode::OK, Json(TownBody::from(town))).into_response()
        }
        Err(e) => error_response("save", e),
    }
}

/// Overwrite name and coordinates of the town called `name`.
///
/// When no such town exists, the request body is echoed back and nothing is
/// stored.
#[utoipa::path(
    patch,
    path = "/api/town/{name}",
    params(("name" = String, Path, description = "Current town name")),
    request_body = TownBody,
    responses(
        (status = 200, description = "Updated town, or the patch if missing", body = TownBody),
        (status = 409, description = "New name already exists", body = ErrorResponse)
    ),
    tag = "towns"
)]
pub async fn update_town(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(body): Json<TownBody>,
) -> impl IntoResponse {
    match state.town_service.update_town(&name, body.into()) {
        Ok(outcome) => {
            tracing::info!(name = %name, updated = outcome.is_updated(), "Town update");
            (StatusCode::OK, Json(TownBody::from(outcome.into_town()))).into_response()
        }
        Err(e) => error_response("update", e),
    }
}

/// Delete the town called `name`.
///
/// Responds `true` when the town is gone, including when it never existed.
#[utoipa::path(
    delete,
    path = "/api/town/{name}",
    params(("name" = String, Path, description = "Town name")),
    responses(
        (status = 200, description = "Whether the town is gone", body = bool),
        (status = 503, description = "Store unavailable", body = ErrorResponse)
    ),
    tag = "towns"
)]
pub async fn delete_town(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.town_service.delete_town(&name) {
        Ok(outcome) => {
            tracing::info!(name = %name, outcome = ?outcome, "Town delete");
            (StatusCode::OK, Json(outcome.succeeded())).into_response()
        }
        Err(e) => error_response("delete", e),
    }
}

/// Every town as a GeoJSON FeatureCollection.
#[utoipa::path(
    get,
    path = "/api/towns.geojson",
    responses(
        (status = 200, description = "FeatureCollection of town points"),
        (status = 503, description = "Store unavailable", body = ErrorResponse)
    ),
    tag = "towns"
)]
pub async fn towns_geojson(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.town_service.get(&Criteria::all()) {
        Ok(towns) => (
            StatusCode::OK,
            Json(towndiff::geojson::towns_to_feature_collection(&towns)),
        )
            .into_response(),
        Err(e) => error_response("geojson", e),
    }
}

/// Create an error response for a failed town operation.
fn error_response(operation: &str, e: TownError) -> axum::response::Response {
    let status = match &e {
        TownError::ConstraintViolation { .. } | TownError::IdsExhausted { .. } => {
            StatusCode::CONFLICT
        }
        TownError::NotFound { .. } => StatusCode::NOT_FOUND,
        TownError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        TownError::Parse { .. } => StatusCode::BAD_REQUEST,
        TownError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    tracing::warn!(operation = operation, error = %e, "Town operation failed");

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

/// Health check endpoint.
///
/// Returns service status and version.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "system"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_town_body_deserialize_partial() {
        let json = r#"{"name": "Nice"}"#;
        let body: TownBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.id, 0);
        assert_eq!(body.name, "Nice");
        assert_eq!(body.lat, 0.0);
    }

    #[test]
    fn test_town_body_round_trips_through_town() {
        let town = Town::new("Paris", 48.856613, 2.352222).with_id(4);
        let body = TownBody::from(town.clone());
        assert_eq!(Town::from(body), town);
    }

    #[test]
    fn test_query_into_criteria() {
        let criteria = Criteria::from(TownQuery {
            name: Some("Paris".to_string()),
            id: None,
        });
        assert_eq!(criteria, Criteria::by_name("Paris"));
    }

    #[test]
    fn test_diff_response_serialize() {
        let response = DiffResponse::from(DiffResult::kilometers(691.5));
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("691.5"));
        assert!(json.contains("kilometers"));
    }

    #[test]
    fn test_health_response_serialize() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("0.1.0"));
    }
}
