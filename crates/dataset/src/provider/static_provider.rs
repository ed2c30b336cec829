//! In-memory dataset provider.
//!
//! Buildings are fixed when the provider is built. Waste sites arrive later
//! (usually from a fetched GeoJSON file) and can be swapped in at any time.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::identifiers::*;
use crate::models::{traits::*, types::*};

#[derive(Default)]
struct WasteSiteIndex {
    sites: Vec<Arc<WasteSite>>,
    by_id: HashMap<WasteSiteIdentifier, Arc<WasteSite>>,
}

impl WasteSiteIndex {
    fn new(sites: Vec<WasteSite>) -> Self {
        let sites: Vec<Arc<WasteSite>> = sites.into_iter().map(Arc::new).collect();
        let by_id = sites.iter().map(|s| (s.id.clone(), s.clone())).collect();
        Self { sites, by_id }
    }
}

/// In-memory dataset
pub struct StaticDataset {
    buildings: Vec<Arc<Building>>,
    building_map: HashMap<BuildingIdentifier, Arc<Building>>,
    waste_sites: RwLock<WasteSiteIndex>,
}

impl StaticDataset {
    /// Create a new empty dataset
    pub fn new() -> Self {
        Self::from_data(Vec::new(), Vec::new())
    }

    pub fn from_data(buildings: Vec<Building>, waste_sites: Vec<WasteSite>) -> Self {
        let buildings: Vec<Arc<Building>> = buildings.into_iter().map(Arc::new).collect();

        let building_map: HashMap<_, _> = buildings
            .iter()
            .map(|b| (b.id.clone(), b.clone()))
            .collect();

        Self {
            buildings,
            building_map,
            waste_sites: RwLock::new(WasteSiteIndex::new(waste_sites)),
        }
    }

    /// Build from a JSON array of building records, with no waste sites yet.
    pub fn from_buildings_json(json: &str) -> Result<Self> {
        let records: Vec<BuildingRecord> = serde_json::from_str(json)?;
        let buildings = records
            .into_iter()
            .map(BuildingRecord::into_building)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_data(buildings, Vec::new()))
    }

    /// Replace the whole waste-site list.
    pub fn replace_waste_sites(&self, sites: Vec<WasteSite>) {
        *self.waste_sites.write() = WasteSiteIndex::new(sites);
    }

    pub fn waste_site_count(&self) -> usize {
        self.waste_sites.read().sites.len()
    }
}

impl Default for StaticDataset {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetProvider for StaticDataset {
    fn building(&self, id: &BuildingIdentifier) -> Option<Arc<Building>> {
        self.building_map.get(id).cloned()
    }

    fn waste_site(&self, id: &WasteSiteIdentifier) -> Option<Arc<WasteSite>> {
        self.waste_sites.read().by_id.get(id).cloned()
    }

    fn all_buildings(&self) -> Vec<Arc<Building>> {
        self.buildings.clone()
    }

    fn all_waste_sites(&self) -> Vec<Arc<WasteSite>> {
        self.waste_sites.read().sites.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    const BUILDINGS: &str = r#"[
        {"id": "B1", "name": "X Apartment", "coords": [27.18158, 38.46393], "wasteSiteId": "W1",
         "trips": ["2025-01-05", "2025-01-10", "2025-02-01"]},
        {"id": "B2", "name": "Y Apartment", "coords": [27.1434, 38.4239], "wasteSiteId": "W1",
         "trips": ["2025-01-07", "2025-03-15"]}
    ]"#;

    #[test]
    fn test_empty_dataset() {
        let dataset = StaticDataset::new();
        assert_eq!(dataset.all_buildings().len(), 0);
        assert_eq!(dataset.all_waste_sites().len(), 0);
    }

    #[test]
    fn test_dataset_lookups() {
        let dataset = StaticDataset::from_buildings_json(BUILDINGS).unwrap();

        let b1 = dataset.building(&BuildingIdentifier::new("B1")).unwrap();
        assert_eq!(&*b1.name, "X Apartment");
        assert!(dataset.building(&BuildingIdentifier::new("B3")).is_none());

        let ids: Vec<_> = dataset.all_buildings().iter().map(|b| b.id.to_string()).collect();
        assert_eq!(ids, vec!["B1", "B2"]);
    }

    #[test]
    fn test_waste_sites_arrive_later() {
        let dataset = StaticDataset::from_buildings_json(BUILDINGS).unwrap();
        let b1 = dataset.building(&"B1".into()).unwrap();

        // Nothing loaded yet: resolution fails instead of panicking
        assert!(dataset.waste_site_for(&b1).is_none());

        dataset.replace_waste_sites(vec![WasteSite::new("W1", "Harmandali", Point::new(27.1, 38.5))]);
        assert_eq!(dataset.waste_site_count(), 1);
        assert_eq!(&*dataset.waste_site_for(&b1).unwrap().name, "Harmandali");

        dataset.replace_waste_sites(Vec::new());
        assert!(dataset.waste_site_for(&b1).is_none());
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            StaticDataset::from_buildings_json("{\"not\": \"a list\"}"),
            Err(DatasetError::SerializationError(_))
        ));
    }
}
