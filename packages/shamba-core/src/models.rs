use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::geometry::PolygonGeometry;

// Feature ids arrive either as integer database keys or as generated
// string ids, GeoJSON allows both
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Int(i64),
    Text(String),
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureId::Int(id) => write!(f, "{}", id),
            FeatureId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for FeatureId {
    fn from(id: i64) -> Self {
        FeatureId::Int(id)
    }
}

impl From<&str> for FeatureId {
    fn from(id: &str) -> Self {
        FeatureId::Text(id.to_string())
    }
}

impl From<String> for FeatureId {
    fn from(id: String) -> Self {
        FeatureId::Text(id)
    }
}

// One farm boundary record. Database rows store the geometry under "geom",
// sometimes as an embedded JSON string, so deserialization accepts all of
// those shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmFeature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(alias = "geom", deserialize_with = "geometry_from_object_or_string")]
    pub geometry: PolygonGeometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farmer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segmentation_task_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_area_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_mask_id: Option<i64>,
}

impl FarmFeature {
    // A boundary that has not been persisted yet
    pub fn draft(geometry: PolygonGeometry) -> Self {
        FarmFeature {
            id: None,
            name: None,
            geometry,
            created_at: None,
            farmer_id: None,
            segmentation_task_id: None,
            selected_area_id: None,
            source_mask_id: None,
        }
    }
}

fn geometry_from_object_or_string<'de, D>(deserializer: D) -> Result<PolygonGeometry, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Object(PolygonGeometry),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Object(geometry) => Ok(geometry),
        Raw::Text(json) => serde_json::from_str(&json).map_err(serde::de::Error::custom),
    }
}

// Stroke color the widget falls back to when a farm has no palette entry
pub const DEFAULT_COLOR: &str = "#3388ff";

// Path style for one rendered boundary, serialized with the camelCase keys
// map widgets expect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStyle {
    pub color: String,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub weight: f64,
    pub opacity: f64,
}

impl Default for FeatureStyle {
    fn default() -> Self {
        FeatureStyle::for_color(DEFAULT_COLOR)
    }
}

impl FeatureStyle {
    // The standard farm style in a given color
    pub fn for_color(color: &str) -> Self {
        FeatureStyle {
            color: color.to_string(),
            fill_color: color.to_string(),
            fill_opacity: 0.3,
            weight: 2.0,
            opacity: 0.8,
        }
    }

    // Orange emphasis style for the focused farm
    pub fn highlight() -> Self {
        FeatureStyle {
            color: "#FFA500".to_string(),
            fill_color: "#FFA500".to_string(),
            fill_opacity: 0.5,
            weight: 3.0,
            opacity: 1.0,
        }
    }
}
