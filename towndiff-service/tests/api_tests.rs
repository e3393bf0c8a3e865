//! Integration tests for the HTTP API.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use std::fs::File;
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;
use towndiff::{Criteria, MemoryTownStore, Town, TownError, TownServiceBuilder, TownStore};
use towndiff_service::{app, AppState};

const PARIS_KM: f64 = 691.5725305976358;

/// Create a test server over a store holding Antibes (id 1) and Paris (id 2).
fn create_test_server() -> TestServer {
    let store = MemoryTownStore::with_towns([
        Town::new("Antibes", 43.580719, 7.12087),
        Town::new("Paris", 48.856613, 2.352222),
    ])
    .unwrap();
    server_over(store)
}

fn server_over<S: TownStore + 'static>(store: S) -> TestServer {
    let state = Arc::new(AppState::new(store));
    TestServer::new(app(state)).unwrap()
}

/// Store that cannot be reached.
struct DownStore;

impl TownStore for DownStore {
    fn find(&self, _: &Criteria) -> towndiff::Result<Vec<Town>> {
        Err(down())
    }
    fn create(&self, _: Town) -> towndiff::Result<Town> {
        Err(down())
    }
    fn update(&self, _: Town) -> towndiff::Result<Town> {
        Err(down())
    }
    fn delete(&self, _: &Town) -> towndiff::Result<u64> {
        Err(down())
    }
}

fn down() -> TownError {
    TownError::StoreUnavailable {
        reason: "connection refused".to_string(),
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_openapi_document_served() {
    let server = create_test_server();

    let response = server.get("/api-docs/openapi.json").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert!(json["paths"]["/api/town"].is_object());
    assert!(json["paths"]["/api/town/{home}/diff/{dest}"].is_object());
}

// Diff endpoint tests

#[tokio::test]
async fn test_diff_known_towns() {
    let server = create_test_server();

    let response = server.get("/api/town/Antibes/diff/Paris").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["units"], "kilometers");
    let distance = json["distance"].as_f64().unwrap();
    assert!((distance - PARIS_KM).abs() < 1e-6, "got {}", distance);
}

#[tokio::test]
async fn test_diff_is_symmetric_and_zero_on_self() {
    let server = create_test_server();

    let there: Value = server.get("/api/town/Antibes/diff/Paris").await.json();
    let back: Value = server.get("/api/town/Paris/diff/Antibes").await.json();
    let there = there["distance"].as_f64().unwrap();
    let back = back["distance"].as_f64().unwrap();
    assert!((there - back).abs() < 1e-9);

    let same: Value = server.get("/api/town/Paris/diff/Paris").await.json();
    assert!(same["distance"].as_f64().unwrap().abs() < 1e-3);
}

#[tokio::test]
async fn test_diff_missing_town_returns_null() {
    let server = create_test_server();

    for path in ["/api/town/Nice/diff/Paris", "/api/town/Paris/diff/Nice"] {
        let response = server.get(path).await;
        response.assert_status_ok();
        let json: Value = response.json();
        assert!(json.is_null(), "{} returned {}", path, json);
    }
}

#[tokio::test]
async fn test_diff_names_are_percent_decoded() {
    let server = create_test_server();
    server
        .post("/api/town")
        .json(&json!({"name": "Saint Tropez", "lat": 43.2727, "lon": 6.6406}))
        .await
        .assert_status_ok();

    let response = server.get("/api/town/Saint%20Tropez/diff/Antibes").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert!(json["distance"].as_f64().unwrap() > 0.0);
}

// Lookup endpoint tests

#[tokio::test]
async fn test_get_all_towns() {
    let server = create_test_server();

    let response = server.get("/api/town").await;

    response.assert_status_ok();
    let json: Value = response.json();
    let towns = json.as_array().unwrap();
    assert_eq!(towns.len(), 2);
    assert_eq!(towns[0]["id"], 1);
    assert_eq!(towns[0]["name"], "Antibes");
    assert_eq!(towns[1]["name"], "Paris");
}

#[tokio::test]
async fn test_get_towns_by_query() {
    let server = create_test_server();

    let json: Value = server.get("/api/town?name=Paris").await.json();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["id"], 2);

    let json: Value = server.get("/api/town?id=1").await.json();
    assert_eq!(json[0]["name"], "Antibes");

    let json: Value = server.get("/api/town?name=Paris&id=1").await.json();
    assert!(json.as_array().unwrap().is_empty());

    let json: Value = server.get("/api/town?name=Nice").await.json();
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_towns_by_json_body() {
    let server = create_test_server();

    let response = server.get("/api/town").json(&json!({"name": "Antibes"})).await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["lat"], 43.580719);
}

#[tokio::test]
async fn test_get_towns_malformed_body() {
    let server = create_test_server();

    let response = server.get("/api/town").text("{not json").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert!(json["error"].as_str().is_some());
}

// Save endpoint tests

#[tokio::test]
async fn test_save_then_get_round_trip() {
    let server = create_test_server();

    let response = server
        .post("/api/town")
        .json(&json!({"name": "Nice", "lat": 43.7102, "lon": 7.262}))
        .await;

    response.assert_status_ok();
    let saved: Value = response.json();
    assert_eq!(saved["id"], 3);

    let found: Value = server.get("/api/town?name=Nice").await.json();
    assert_eq!(found, json!([saved]));
}

#[tokio::test]
async fn test_save_duplicate_name_conflicts() {
    let server = create_test_server();

    let response = server
        .post("/api/town")
        .json(&json!({"name": "Paris", "lat": 0.0, "lon": 0.0}))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("Paris"));
}

#[tokio::test]
async fn test_save_after_max_id_conflicts_and_store_stays_up() {
    let server = create_test_server();

    let response = server
        .post("/api/town")
        .json(&json!({"id": u64::MAX, "name": "Nice", "lat": 43.7102, "lon": 7.262}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["id"], u64::MAX);

    let response = server
        .post("/api/town")
        .json(&json!({"name": "Cannes", "lat": 43.5528, "lon": 7.0174}))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    let json: Value = server.get("/api/town").await.json();
    assert_eq!(json.as_array().unwrap().len(), 3);
    server
        .get("/api/town/Antibes/diff/Nice")
        .await
        .assert_status_ok();
}

// Update endpoint tests

#[tokio::test]
async fn test_update_existing_town() {
    let server = create_test_server();

    let response = server
        .patch("/api/town/Paris")
        .json(&json!({"name": "Lutetia", "lat": 48.85, "lon": 2.35}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["id"], 2);
    assert_eq!(json["name"], "Lutetia");

    let json: Value = server.get("/api/town?name=Paris").await.json();
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_missing_town_echoes_patch() {
    let server = create_test_server();
    let patch = json!({"id": 0, "name": "Nice", "lat": 43.7102, "lon": 7.262});

    let response = server.patch("/api/town/Nice").json(&patch).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), patch);

    // Nothing was created
    let json: Value = server.get("/api/town").await.json();
    assert_eq!(json.as_array().unwrap().len(), 2);
}

// Delete endpoint tests

#[tokio::test]
async fn test_delete_existing_and_missing() {
    let server = create_test_server();

    let response = server.delete("/api/town/Paris").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!(true));

    // Already gone: still reported as success
    let response = server.delete("/api/town/Paris").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!(true));

    let json: Value = server.get("/api/town").await.json();
    assert_eq!(json.as_array().unwrap().len(), 1);
}

// GeoJSON export

#[tokio::test]
async fn test_towns_geojson() {
    let server = create_test_server();

    let response = server.get("/api/towns.geojson").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["type"], "FeatureCollection");
    let features = json["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(features[1]["properties"]["name"], "Paris");

    let coords = features[1]["geometry"]["coordinates"].as_array().unwrap();
    assert_eq!(coords[0].as_f64().unwrap(), 2.352222);
    assert_eq!(coords[1].as_f64().unwrap(), 48.856613);
}

// Store failures

#[tokio::test]
async fn test_store_unavailable_maps_to_503() {
    let server = server_over(DownStore);

    server
        .get("/api/town")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    server
        .get("/api/town/Antibes/diff/Paris")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    server
        .delete("/api/town/Paris")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

// Seeded startup

#[tokio::test]
async fn test_server_over_seed_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("towns.geojson");
    let mut file = File::create(&path).unwrap();
    file.write_all(
        br#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [7.12087, 43.580719]}, "properties": {"name": "Antibes"}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [2.352222, 48.856613]}, "properties": {"name": "Paris"}}
            ]
        }"#,
    )
    .unwrap();

    let service = TownServiceBuilder::new().seed_file(&path).build().unwrap();
    let server = server_over(service.into_store());

    let json: Value = server.get("/api/town/Antibes/diff/Paris").await.json();
    assert!((json["distance"].as_f64().unwrap() - PARIS_KM).abs() < 1e-6);
}
