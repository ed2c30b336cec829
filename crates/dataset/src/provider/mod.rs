//! Dataset providers and loaders.

pub mod static_provider;
pub mod waste_sites;

pub use static_provider::StaticDataset;
pub use waste_sites::{load_waste_sites, parse_waste_sites};
