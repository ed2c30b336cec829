//! Test doubles shared by the module tests.

use std::sync::Arc;

use city_replay_dataset::{Building, StaticDataset, WasteSite};
use geo::Point;
use geojson::FeatureCollection;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::config::CameraPreset;
use crate::geometry::Bounds;
use crate::presentation::{LayerSpec, Presentation, ROUTE_LAYER_ID, TRUCK_LAYER_ID};

#[derive(Clone, Debug)]
pub struct Frame {
    pub at: Instant,
    pub layer_id: String,
    pub features: FeatureCollection,
}

#[derive(Default)]
pub struct RecordingPresentation {
    layers: Mutex<Vec<LayerSpec>>,
    frames: Mutex<Vec<Frame>>,
    fits: Mutex<Vec<(Bounds, CameraPreset)>>,
}

impl RecordingPresentation {
    pub fn declared_layers(&self) -> Vec<LayerSpec> {
        self.layers.lock().clone()
    }

    pub fn frames(&self, layer_id: &str) -> Vec<Frame> {
        self.frames
            .lock()
            .iter()
            .filter(|f| f.layer_id == layer_id)
            .cloned()
            .collect()
    }

    pub fn truck_frames(&self) -> Vec<Frame> {
        self.frames(TRUCK_LAYER_ID)
    }

    pub fn route_frames(&self) -> Vec<Frame> {
        self.frames(ROUTE_LAYER_ID)
    }

    pub fn fits(&self) -> Vec<(Bounds, CameraPreset)> {
        self.fits.lock().clone()
    }

    /// Truck labels in the order they first appeared, with the time they did.
    pub fn truck_appearances(&self) -> Vec<(String, Instant)> {
        let mut seen: Vec<(String, Instant)> = Vec::new();
        for frame in self.truck_frames() {
            for feature in &frame.features.features {
                let id = feature
                    .property("id")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                if !seen.iter().any(|(known, _)| *known == id) {
                    seen.push((id, frame.at));
                }
            }
        }
        seen
    }

    /// Labels of trucks in the order they first appeared.
    pub fn truck_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for frame in self.truck_frames() {
            for feature in &frame.features.features {
                let label = feature
                    .property("label")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        labels
    }
}

impl Presentation for RecordingPresentation {
    fn declare_layer(&self, layer: &LayerSpec) {
        self.layers.lock().push(layer.clone());
    }

    fn replace_features(&self, layer_id: &str, features: FeatureCollection) {
        self.frames.lock().push(Frame {
            at: Instant::now(),
            layer_id: layer_id.to_string(),
            features,
        });
    }

    fn fit_bounds(&self, bounds: Bounds, camera: &CameraPreset) {
        self.fits.lock().push((bounds, *camera));
    }
}

pub struct Fixture {
    pub b1: Building,
    pub b2: Building,
    /// Points at a waste site that does not exist
    pub b3: Building,
    pub w1: WasteSite,
}

impl Fixture {
    pub fn dataset(&self) -> Arc<StaticDataset> {
        Arc::new(StaticDataset::from_data(
            vec![self.b1.clone(), self.b2.clone(), self.b3.clone()],
            vec![self.w1.clone()],
        ))
    }
}

fn building(id: &str, name: &str, location: Point, site: &str, trips: &[&str]) -> Building {
    Building {
        id: id.into(),
        name: name.into(),
        location,
        waste_site_id: site.into(),
        trips: trips.iter().map(|t| (*t).into()).collect(),
        old_stats: None,
        new_stats: None,
    }
}

pub fn fixture() -> Fixture {
    Fixture {
        b1: building(
            "B1",
            "X Apartment",
            Point::new(27.18158, 38.46393),
            "W1",
            &["2025-02-01", "2025-01-05", "2025-01-10"],
        ),
        b2: building(
            "B2",
            "Y Apartment",
            Point::new(27.1434, 38.4239),
            "W1",
            &["2025-01-07", "2025-03-15"],
        ),
        b3: building(
            "B3",
            "Z Apartment",
            Point::new(27.15, 38.44),
            "W9",
            &["2025-01-08"],
        ),
        w1: WasteSite::new("W1", "Harmandali", Point::new(27.0856, 38.5102)),
    }
}
