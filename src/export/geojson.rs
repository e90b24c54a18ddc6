//! GeoJSON export of experiences that carry coordinates

use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::experience::Experience;

/// FeatureCollection of Point features, `[longitude, latitude]` order
pub fn to_geojson(records: &[Experience]) -> Result<String> {
    let features: Vec<Value> = records
        .iter()
        .filter_map(|record| {
            let coords = record.context.location.coordinates?;
            Some(json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [coords.longitude, coords.latitude],
                },
                "properties": {
                    "id": record.id,
                    "timestamp": record.timestamp.to_rfc3339(),
                    "learner": record.learner.id,
                    "location": record.location_name(),
                    "type": record.experience.kind,
                    "domains": record.experience.domains,
                    "description": record.experience.description,
                },
            }))
        })
        .collect();

    let collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    serde_json::to_string_pretty(&collection).context("Failed to serialize GeoJSON")
}
