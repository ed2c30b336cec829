//! The read-only interface the animation core uses to reach the dataset.
//!
//! Implementations can be in-memory, database-backed, or remote.

use std::sync::Arc;

use crate::identifiers::*;
use crate::models::types::{Building, WasteSite};

/// Provider of buildings and waste sites with lookup methods
pub trait DatasetProvider: Send + Sync {
    // ---- Lookups ----
    fn building(&self, id: &BuildingIdentifier) -> Option<Arc<Building>>;
    fn waste_site(&self, id: &WasteSiteIdentifier) -> Option<Arc<WasteSite>>;

    // ---- Collections ----

    /// All buildings, in load order
    fn all_buildings(&self) -> Vec<Arc<Building>>;

    /// All waste sites known so far. May be empty while the sites are still loading.
    fn all_waste_sites(&self) -> Vec<Arc<WasteSite>>;

    /// Resolve a building's waste site
    fn waste_site_for(&self, building: &Building) -> Option<Arc<WasteSite>> {
        self.waste_site(&building.waste_site_id)
    }
}
