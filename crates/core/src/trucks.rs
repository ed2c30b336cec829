//! Live truck markers, one per running trip.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use geo::Point;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::presentation::collection;

static NEXT_TRUCK_ID: AtomicU64 = AtomicU64::new(1);

/// Unique for the lifetime of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TruckId(u64);

impl TruckId {
    pub fn next() -> Self {
        Self(NEXT_TRUCK_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TruckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "truck-{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Truck {
    pub id: TruckId,
    pub position: Point,
    pub label: String,
}

/// Trucks in insertion order. Each animation only touches its own entry.
#[derive(Default)]
pub struct TruckCollection {
    trucks: Vec<Truck>,
}

impl TruckCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, truck: Truck) {
        self.trucks.push(truck);
    }

    /// Returns `false` if the truck is gone.
    pub fn move_to(&mut self, id: TruckId, position: Point) -> bool {
        match self.trucks.iter_mut().find(|t| t.id == id) {
            Some(truck) => {
                truck.position = position;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: TruckId) -> Option<Truck> {
        let index = self.trucks.iter().position(|t| t.id == id)?;
        Some(self.trucks.remove(index))
    }

    pub fn get(&self, id: TruckId) -> Option<&Truck> {
        self.trucks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.trucks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trucks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Truck> {
        self.trucks.iter()
    }

    pub fn feature_collection(&self) -> FeatureCollection {
        collection(
            self.trucks
                .iter()
                .map(|truck| {
                    let mut properties = JsonObject::new();
                    properties.insert("id".to_string(), truck.id.to_string().into());
                    properties.insert("label".to_string(), truck.label.clone().into());

                    Feature {
                        bbox: None,
                        geometry: Some(Geometry::new(Value::Point(vec![
                            truck.position.x(),
                            truck.position.y(),
                        ]))),
                        id: None,
                        properties: Some(properties),
                        foreign_members: None,
                    }
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truck(label: &str) -> Truck {
        Truck {
            id: TruckId::next(),
            position: Point::new(27.18, 38.46),
            label: label.to_string(),
        }
    }

    #[test]
    fn test_truck_ids_are_unique() {
        let ids: std::collections::HashSet<_> = (0..1000).map(|_| TruckId::next()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_updates_touch_only_their_truck() {
        let mut trucks = TruckCollection::new();
        let a = truck("a");
        let b = truck("b");
        let (a_id, b_id) = (a.id, b.id);
        trucks.insert(a);
        trucks.insert(b);

        assert!(trucks.move_to(a_id, Point::new(27.0, 38.0)));
        assert_eq!(trucks.get(b_id).unwrap().position, Point::new(27.18, 38.46));

        assert_eq!(trucks.remove(a_id).unwrap().label, "a");
        assert!(!trucks.move_to(a_id, Point::new(0.0, 0.0)));
        assert!(trucks.remove(a_id).is_none());
        assert_eq!(trucks.len(), 1);
    }

    #[test]
    fn test_feature_collection() {
        let mut trucks = TruckCollection::new();
        let t = truck("X Apartment → Harmandali (2025-01-05)");
        let id = t.id;
        trucks.insert(t);

        let fc = trucks.feature_collection();
        assert_eq!(fc.features.len(), 1);
        assert_eq!(fc.features[0].property("id").unwrap(), id.to_string().as_str());
        assert_eq!(
            fc.features[0].property("label").unwrap(),
            "X Apartment → Harmandali (2025-01-05)"
        );
    }
}
