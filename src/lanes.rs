//! Bike-lane line layers drawn under the station markers.
//!
//! The GeoJSON is not validated; we only count what the renderer would draw.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::fetch::{HttpClient, load_source};

/// Line styling shared by the bike-lane layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePaint {
    pub color: String,
    pub width: f64,
    pub opacity: f64,
}

impl Default for LinePaint {
    fn default() -> Self {
        LinePaint {
            color: "green".to_string(),
            width: 5.0,
            opacity: 0.4,
        }
    }
}

/// A GeoJSON source rendered as a line layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneLayer {
    pub id: String,
    pub source: String,
    #[serde(default)]
    pub paint: LinePaint,
}

impl LaneLayer {
    pub fn new(id: &str, source: &str) -> Self {
        LaneLayer {
            id: id.to_string(),
            source: source.to_string(),
            paint: LinePaint::default(),
        }
    }
}

/// Geometry counts for a loaded lane layer.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct LaneSummary {
    pub id: String,
    pub features: usize,
    pub line_strings: usize,
    pub multi_line_strings: usize,
    pub other_geometries: usize,
}

impl LaneSummary {
    /// Counts features by geometry type. Anything other than a
    /// `FeatureCollection` has no features.
    pub fn from_geojson(id: &str, doc: &Value) -> Self {
        let mut s = LaneSummary {
            id: id.to_string(),
            ..Default::default()
        };

        if doc["type"].as_str() != Some("FeatureCollection") {
            return s;
        }

        let Some(features) = doc["features"].as_array() else {
            return s;
        };

        s.features = features.len();
        for feature in features {
            match feature["geometry"]["type"].as_str() {
                Some("LineString") => s.line_strings += 1,
                Some("MultiLineString") => s.multi_line_strings += 1,
                _ => s.other_geometries += 1,
            }
        }

        s
    }
}

/// Loads one lane layer and summarizes it.
#[tracing::instrument(skip(client, layer), fields(layer = %layer.id))]
pub async fn load_lane_layer<C: HttpClient>(client: &C, layer: &LaneLayer) -> Result<LaneSummary> {
    let bytes = load_source(client, &layer.source).await?;
    let doc: Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("malformed GeoJSON for layer {}", layer.id))?;

    let summary = LaneSummary::from_geojson(&layer.id, &doc);
    info!(
        features = summary.features,
        line_strings = summary.line_strings,
        multi_line_strings = summary.multi_line_strings,
        "Lane layer loaded"
    );
    Ok(summary)
}
