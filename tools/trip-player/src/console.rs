use std::sync::atomic::{AtomicUsize, Ordering};

use city_replay_core::{Bounds, CameraPreset, LayerSpec, Presentation};
use city_replay_core::presentation::TRUCK_LAYER_ID;
use geojson::FeatureCollection;
use tracing::{debug, info};

/// Draws nothing; reports what a map would be asked to draw.
#[derive(Default)]
pub struct ConsolePresentation {
    frames: AtomicUsize,
}

impl ConsolePresentation {
    pub fn frames_drawn(&self) -> usize {
        self.frames.load(Ordering::Relaxed)
    }
}

impl Presentation for ConsolePresentation {
    fn declare_layer(&self, layer: &LayerSpec) {
        debug!("Layer {} ({:?}) on source {}", layer.id, layer.kind, layer.source_id);
    }

    fn replace_features(&self, layer_id: &str, features: FeatureCollection) {
        self.frames.fetch_add(1, Ordering::Relaxed);

        // Truck frames arrive once per step
        if layer_id == TRUCK_LAYER_ID {
            debug!("{layer_id}: {} trucks", features.features.len());
        } else {
            info!("{layer_id}: {} features", features.features.len());
        }
    }

    fn fit_bounds(&self, bounds: Bounds, camera: &CameraPreset) {
        let [[west, south], [east, north]] = bounds.to_array();
        info!(
            "Camera: [{west:.5}, {south:.5}] .. [{east:.5}, {north:.5}] padding {} max zoom {} over {} ms",
            camera.padding, camera.max_zoom, camera.duration_ms
        );
    }
}
