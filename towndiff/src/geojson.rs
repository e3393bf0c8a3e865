//! GeoJSON conversion for towns.
//!
//! Each town maps to a `Point` feature whose coordinates are `[lon, lat]`,
//! with `name` and `id` as properties. Enable the `geojson` feature to use
//! this module.
//!
//! # Example
//!
//! ```
//! use towndiff::Town;
//! use towndiff::geojson::towns_to_feature_collection;
//!
//! let towns = vec![Town::new("Paris", 48.856613, 2.352222).with_id(1)];
//! let collection = towns_to_feature_collection(&towns);
//! assert_eq!(collection.features.len(), 1);
//! ```

use geojson::{feature::Id, Feature, FeatureCollection, GeoJson, Geometry, Value as GeoJsonValue};
use serde_json::{Map, Value as JsonValue};

use crate::error::{Result, TownError};
use crate::town::Town;

/// Convert a town to a `Point` feature.
pub fn town_to_feature(town: &Town) -> Feature {
    let mut properties = Map::new();
    properties.insert("name".to_string(), JsonValue::from(town.name.clone()));
    properties.insert("id".to_string(), JsonValue::from(town.id));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeoJsonValue::Point(vec![town.lon, town.lat]))),
        id: Some(Id::Number(town.id.into())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Convert towns to a `FeatureCollection`, preserving order.
pub fn towns_to_feature_collection(towns: &[Town]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: towns.iter().map(town_to_feature).collect(),
        foreign_members: None,
    }
}

/// Read a town from a `Point` feature with a `name` property.
///
/// The `id` property is optional and defaults to `0` (store-assigned).
///
/// # Errors
///
/// Returns [`TownError::Parse`] if the feature has no point geometry, the
/// position has fewer than 2 elements, or `name` is missing.
pub fn town_from_feature(feature: &Feature) -> Result<Town> {
    let position = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(GeoJsonValue::Point(position)) => position,
        _ => return Err(parse_error("Town features must have Point geometry")),
    };
    if position.len() < 2 {
        return Err(parse_error(
            "Coordinate must have at least 2 elements (lon, lat)",
        ));
    }

    let name = feature
        .property("name")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| parse_error("Town features must have a string 'name' property"))?;
    let id = feature
        .property("id")
        .and_then(JsonValue::as_u64)
        .unwrap_or(0);

    Ok(Town::new(name, position[1], position[0]).with_id(id))
}

/// Read towns from a GeoJSON document.
///
/// Accepts a single `Feature` or a `FeatureCollection`; bare geometries carry
/// no name and are rejected.
pub fn towns_from_geojson(geojson: GeoJson) -> Result<Vec<Town>> {
    match geojson {
        GeoJson::Feature(feature) => Ok(vec![town_from_feature(&feature)?]),
        GeoJson::FeatureCollection(collection) => {
            collection.features.iter().map(town_from_feature).collect()
        }
        GeoJson::Geometry(_) => Err(parse_error(
            "Expected a Feature or FeatureCollection of towns",
        )),
    }
}

fn parse_error(message: &str) -> TownError {
    TownError::Parse {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_town_to_feature_uses_lon_lat_order() {
        let feature = town_to_feature(&Town::new("Paris", 48.856613, 2.352222).with_id(3));

        match feature.geometry.as_ref().map(|g| &g.value) {
            Some(GeoJsonValue::Point(coord)) => assert_eq!(coord, &vec![2.352222, 48.856613]),
            other => panic!("Expected Point geometry, got {:?}", other),
        }
        assert_eq!(
            feature.property("name").and_then(JsonValue::as_str),
            Some("Paris")
        );
        assert_eq!(feature.property("id").and_then(JsonValue::as_u64), Some(3));
    }

    #[test]
    fn test_towns_from_feature_collection() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [7.12087, 43.580719]},
                    "properties": {"name": "Antibes"}
                },
                {
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [2.352222, 48.856613]},
                    "properties": {"name": "Paris", "id": 9}
                }
            ]
        }"#;
        let geojson: GeoJson = json.parse().unwrap();
        let towns = towns_from_geojson(geojson).unwrap();

        assert_eq!(
            towns,
            vec![
                Town::new("Antibes", 43.580719, 7.12087),
                Town::new("Paris", 48.856613, 2.352222).with_id(9),
            ]
        );
    }

    #[test]
    fn test_invalid_features_rejected() {
        let line = Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoJsonValue::LineString(vec![
                vec![0.0, 0.0],
                vec![1.0, 1.0],
            ]))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        assert!(matches!(
            town_from_feature(&line),
            Err(TownError::Parse { .. })
        ));

        let unnamed = Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoJsonValue::Point(vec![1.0, 2.0]))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        assert!(town_from_feature(&unnamed).is_err());

        let bare = GeoJson::Geometry(Geometry::new(GeoJsonValue::Point(vec![1.0, 2.0])));
        assert!(towns_from_geojson(bare).is_err());
    }
}
