//! The map engine as seen from the animation core.

use geojson::FeatureCollection;
use serde_json::json;

use crate::config::CameraPreset;
use crate::geometry::Bounds;

pub const TRUCK_SOURCE_ID: &str = "truck-anim-src";
pub const TRUCK_LAYER_ID: &str = "truck-anim-layer";
pub const ROUTE_SOURCE_ID: &str = "route-anim-src";
pub const ROUTE_LAYER_ID: &str = "route-anim-layer";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    /// Point features drawn as circles
    Circle,
    Line,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayerSpec {
    pub id: &'static str,
    pub source_id: &'static str,
    pub kind: LayerKind,
    /// Engine-specific paint properties
    pub paint: serde_json::Value,
}

impl LayerSpec {
    /// Red circles that grow with zoom.
    pub fn trucks() -> Self {
        Self {
            id: TRUCK_LAYER_ID,
            source_id: TRUCK_SOURCE_ID,
            kind: LayerKind::Circle,
            paint: json!({
                "circle-radius": ["interpolate", ["linear"], ["zoom"], 12, 4, 16, 10, 19, 20],
                "circle-color": "#D30000",
                "circle-opacity": 0.85,
                "circle-stroke-width": 2,
                "circle-stroke-color": "#003333"
            }),
        }
    }

    /// Dashed amber building → waste-site lines.
    pub fn routes() -> Self {
        Self {
            id: ROUTE_LAYER_ID,
            source_id: ROUTE_SOURCE_ID,
            kind: LayerKind::Line,
            paint: json!({
                "line-color": "#ffcc66",
                "line-width": ["interpolate", ["linear"], ["zoom"], 12, 1.2, 16, 3, 19, 5],
                "line-opacity": 0.75,
                "line-dasharray": [2, 1]
            }),
        }
    }
}

/// Rendering engine that owns the actual drawing.
///
/// Calls come from animation tasks and must not block for long.
pub trait Presentation: Send + Sync {
    /// Declare a layer with an empty feature set. Called once per layer.
    fn declare_layer(&self, layer: &LayerSpec);

    /// Replace every feature of a declared layer.
    fn replace_features(&self, layer_id: &str, features: FeatureCollection);

    /// Frame a bounding box, animated.
    fn fit_bounds(&self, bounds: Bounds, camera: &CameraPreset);
}

/// Wrap features into a collection with no bbox or foreign members.
pub fn collection(features: Vec<geojson::Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
