//! Core records and errors for the replay dataset.

use std::sync::Arc;

use geo::Point;
use serde::Deserialize;

use crate::identifiers::*;
use crate::models::stats::BuildingStats;

// ============================================================================
// Records
// ============================================================================

/// A building under renewal, with the dates its waste was trucked away.
#[derive(Clone, Debug, PartialEq)]
pub struct Building {
    pub id: BuildingIdentifier,
    pub name: Arc<str>,
    /// x = longitude, y = latitude
    pub location: Point,
    pub waste_site_id: WasteSiteIdentifier,
    /// ISO `YYYY-MM-DD` strings, in whatever order the data gave them
    pub trips: Vec<Arc<str>>,
    pub old_stats: Option<BuildingStats>,
    pub new_stats: Option<BuildingStats>,
}

impl Building {
    /// Statistics used for filtering: the new state, falling back to the old one.
    pub fn current_stats(&self) -> Option<&BuildingStats> {
        self.new_stats.as_ref().or(self.old_stats.as_ref())
    }

    /// Trip dates sorted lexicographically (which is chronological for ISO dates).
    pub fn sorted_trips(&self) -> Vec<Arc<str>> {
        let mut trips = self.trips.clone();
        trips.sort();
        trips
    }
}

/// A waste site loaded from GeoJSON.
#[derive(Clone, Debug, PartialEq)]
pub struct WasteSite {
    pub id: WasteSiteIdentifier,
    pub name: Arc<str>,
    pub location: Point,
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl WasteSite {
    pub fn new(id: impl Into<WasteSiteIdentifier>, name: impl AsRef<str>, location: Point) -> Self {
        Self {
            id: id.into(),
            name: name.as_ref().into(),
            location,
            properties: serde_json::Map::new(),
        }
    }
}

/// On-disk JSON shape of a building.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingRecord {
    pub id: BuildingIdentifier,
    pub name: String,
    pub coords: [f64; 2],
    pub waste_site_id: WasteSiteIdentifier,
    #[serde(default)]
    pub trips: Vec<String>,
    #[serde(default)]
    pub old_stats: Option<BuildingStats>,
    #[serde(default)]
    pub new_stats: Option<BuildingStats>,
}

impl BuildingRecord {
    pub fn into_building(self) -> Result<Building> {
        let [lon, lat] = self.coords;
        if !lon.is_finite() || !lat.is_finite() {
            return Err(DatasetError::InvalidData(format!(
                "building {} has non-finite coordinates",
                self.id
            )));
        }

        Ok(Building {
            id: self.id,
            name: self.name.into(),
            location: Point::new(lon, lat),
            waste_site_id: self.waste_site_id,
            trips: self.trips.into_iter().map(Arc::from).collect(),
            old_stats: self.old_stats,
            new_stats: self.new_stats,
        })
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DatasetError {
    fn from(err: serde_json::Error) -> Self {
        DatasetError::SerializationError(err.to_string())
    }
}

impl From<geojson::Error> for DatasetError {
    fn from(err: geojson::Error) -> Self {
        DatasetError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DatasetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_into_building() {
        let record: BuildingRecord = serde_json::from_str(
            r#"{
                "id": "B1",
                "name": "X Apartment",
                "coords": [27.18158, 38.46393],
                "wasteSiteId": "W1",
                "trips": ["2025-02-01", "2025-01-05"]
            }"#,
        )
        .unwrap();

        let building = record.into_building().unwrap();
        assert_eq!(building.id, BuildingIdentifier::new("B1"));
        assert_eq!(building.location.x(), 27.18158);
        assert_eq!(building.location.y(), 38.46393);
        assert_eq!(building.waste_site_id.as_str(), "W1");
        assert!(building.old_stats.is_none());
        assert_eq!(
            building.sorted_trips(),
            vec![Arc::<str>::from("2025-01-05"), Arc::<str>::from("2025-02-01")]
        );
        // The stored order is left untouched
        assert_eq!(&*building.trips[0], "2025-02-01");
    }

    #[test]
    fn test_record_rejects_non_finite_coords() {
        let record = BuildingRecord {
            id: "B9".into(),
            name: "Broken".into(),
            coords: [f64::NAN, 38.0],
            waste_site_id: "W1".into(),
            trips: vec![],
            old_stats: None,
            new_stats: None,
        };

        assert!(matches!(record.into_building(), Err(DatasetError::InvalidData(_))));
    }
}
