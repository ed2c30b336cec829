//! Mutable state shared by the animator and scheduler.

use std::sync::Arc;

use city_replay_dataset::{Building, WasteSite};
use geo::Point;
use parking_lot::{Mutex, RwLock};

use crate::presentation::{LayerSpec, Presentation, ROUTE_LAYER_ID, TRUCK_LAYER_ID};
use crate::routes::{Route, RouteRegistry};
use crate::trucks::{Truck, TruckCollection, TruckId};

/// Owns the route registry, the live trucks and the presentation reference.
///
/// Every mutation republishes the affected layer while its lock is held, so
/// the engine never receives a frame older than the last mutation.
#[derive(Default)]
pub struct AnimationContext {
    presentation: RwLock<Option<Arc<dyn Presentation>>>,
    routes: Mutex<RouteRegistry>,
    trucks: Mutex<TruckCollection>,
}

impl AnimationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply the rendering engine and push whatever state already exists.
    ///
    /// The truck and route layers are declared once per engine; attaching the
    /// current one again only republishes.
    pub fn attach(&self, presentation: Arc<dyn Presentation>) {
        {
            let mut slot = self.presentation.write();
            let already_attached = slot
                .as_ref()
                .is_some_and(|current| Arc::ptr_eq(current, &presentation));
            if !already_attached {
                presentation.declare_layer(&LayerSpec::routes());
                presentation.declare_layer(&LayerSpec::trucks());
                *slot = Some(presentation);
            }
        }

        self.publish_routes(&self.routes.lock());
        self.publish_trucks(&self.trucks.lock());
    }

    pub fn presentation(&self) -> Option<Arc<dyn Presentation>> {
        self.presentation.read().clone()
    }

    pub fn has_presentation(&self) -> bool {
        self.presentation.read().is_some()
    }

    // ---- Routes ----

    /// Returns `true` if the route was new (and the route layer was redrawn).
    pub fn ensure_route(&self, building: &Building, site: &WasteSite) -> bool {
        let mut routes = self.routes.lock();
        let added = routes.ensure_route(building, site);
        if added {
            self.publish_routes(&routes);
        }
        added
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().routes().to_vec()
    }

    pub fn route_count(&self) -> usize {
        self.routes.lock().len()
    }

    // ---- Trucks ----

    pub fn add_truck(&self, truck: Truck) {
        let mut trucks = self.trucks.lock();
        trucks.insert(truck);
        self.publish_trucks(&trucks);
    }

    pub fn move_truck(&self, id: TruckId, position: Point) -> bool {
        let mut trucks = self.trucks.lock();
        let moved = trucks.move_to(id, position);
        if moved {
            self.publish_trucks(&trucks);
        }
        moved
    }

    pub fn remove_truck(&self, id: TruckId) -> Option<Truck> {
        let mut trucks = self.trucks.lock();
        let removed = trucks.remove(id);
        if removed.is_some() {
            self.publish_trucks(&trucks);
        }
        removed
    }

    pub fn truck(&self, id: TruckId) -> Option<Truck> {
        self.trucks.lock().get(id).cloned()
    }

    pub fn truck_count(&self) -> usize {
        self.trucks.lock().len()
    }

    fn publish_routes(&self, routes: &RouteRegistry) {
        if let Some(presentation) = self.presentation() {
            presentation.replace_features(ROUTE_LAYER_ID, routes.feature_collection());
        }
    }

    fn publish_trucks(&self, trucks: &TruckCollection) {
        if let Some(presentation) = self.presentation() {
            presentation.replace_features(TRUCK_LAYER_ID, trucks.feature_collection());
        }
    }
}
