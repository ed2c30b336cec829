//! Dataset models, types, and traits.

pub mod calendar;
pub mod stats;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use calendar::{parse_trip_date, DateRange, Timeline, SLIDER_MAX};
pub use stats::{
    stat_ranges, BuildingStats, Categories, CategoryFilter, FilterSummary, SelectedBuilding,
    StatField, StatRange,
};
pub use traits::DatasetProvider;
pub use types::{Building, BuildingRecord, DatasetError, Result, WasteSite};
