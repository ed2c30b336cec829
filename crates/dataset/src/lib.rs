//! # city-replay-dataset
//!
//! Buildings under renewal, the waste sites they send trucks to, and the
//! dated trips between them.
//!
//! ## Features
//!
//! - **Typed records**: buildings and waste sites behind cheap `Arc` identifiers
//! - **Late waste sites**: sites load from GeoJSON after the buildings, through a pluggable fetcher
//! - **Timeline**: trip-date parsing, inclusive ranges and the two-handle slider model
//! - **Statistics**: old/new building stats, value ranges and the category filter summary
//!
//! ## Example
//!
//! ```
//! use city_replay_dataset::prelude::*;
//! use geo::Point;
//!
//! let dataset = StaticDataset::from_buildings_json(r#"[
//!     {"id": "B1", "name": "X Apartment", "coords": [27.18158, 38.46393],
//!      "wasteSiteId": "W1", "trips": ["2025-01-05", "2025-02-01"]}
//! ]"#).unwrap();
//!
//! // Waste sites are not loaded yet
//! let b1 = dataset.building(&BuildingIdentifier::new("B1")).unwrap();
//! assert!(dataset.waste_site_for(&b1).is_none());
//!
//! dataset.replace_waste_sites(vec![WasteSite::new("W1", "Harmandali", Point::new(27.0856, 38.5102))]);
//! assert!(dataset.waste_site_for(&b1).is_some());
//! ```

pub mod identifiers;
pub mod models;
pub mod network;
pub mod provider;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::{calendar::*, stats::*, traits::*, types::*};
    pub use crate::network::traits::*;
    pub use crate::provider::{
        static_provider::StaticDataset,
        waste_sites::{load_waste_sites, parse_waste_sites},
    };
}

pub use prelude::*;
