//! Building → waste-site lines that have been animated at least once.
//!
//! Routes are never removed: they accumulate for the lifetime of the registry.

use std::collections::HashSet;
use std::fmt;

use city_replay_dataset::{Building, BuildingIdentifier, WasteSite, WasteSiteIdentifier};
use geo::Point;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::presentation::collection;

/// `"{building}__{site}"`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RouteKey(String);

impl RouteKey {
    pub fn new(building: &BuildingIdentifier, site: &WasteSiteIdentifier) -> Self {
        Self(format!("{building}__{site}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub key: RouteKey,
    pub building_id: BuildingIdentifier,
    pub waste_site_id: WasteSiteIdentifier,
    pub start: Point,
    pub end: Point,
}

impl Route {
    fn to_feature(&self) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert("id".to_string(), self.key.as_str().into());
        properties.insert("buildingId".to_string(), self.building_id.as_str().into());
        properties.insert("wasteSiteId".to_string(), self.waste_site_id.as_str().into());

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::LineString(vec![
                vec![self.start.x(), self.start.y()],
                vec![self.end.x(), self.end.y()],
            ]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

#[derive(Default)]
pub struct RouteRegistry {
    keys: HashSet<RouteKey>,
    // insertion order, for stable rendering
    routes: Vec<Route>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the route for this pair. Returns `false` if it already existed.
    pub fn ensure_route(&mut self, building: &Building, site: &WasteSite) -> bool {
        let key = RouteKey::new(&building.id, &site.id);
        if self.keys.contains(&key) {
            return false;
        }

        self.keys.insert(key.clone());
        self.routes.push(Route {
            key,
            building_id: building.id.clone(),
            waste_site_id: site.id.clone(),
            start: building.location,
            end: site.location,
        });
        true
    }

    pub fn contains(&self, key: &RouteKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn feature_collection(&self) -> FeatureCollection {
        collection(self.routes.iter().map(Route::to_feature).collect())
    }
}
