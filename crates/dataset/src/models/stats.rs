//! Building statistics, their value ranges and the category filter.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::identifiers::BuildingIdentifier;
use crate::models::types::Building;

/// Statistics for one state (before or after renewal) of a building.
///
/// Missing numeric fields read as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildingStats {
    pub building_name: Option<String>,
    #[serde(alias = "ruhsat")]
    pub permit_date: Option<String>,
    pub area: u32,
    pub construction_area: u32,
    pub floors: u32,
    pub units: u32,
    pub residential: u32,
    pub commercial: u32,
    pub owners: u32,
    pub disabled_owners: u32,
    pub female_heads: u32,
    pub retired: u32,
    pub janitor_flat: Option<String>,
}

/// The numeric statistics that get a min/max range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum StatField {
    Area,
    ConstructionArea,
    Floors,
    Units,
    Residential,
    Commercial,
    Owners,
    DisabledOwners,
    FemaleHeads,
    Retired,
}

impl StatField {
    pub fn value(self, stats: &BuildingStats) -> u32 {
        match self {
            StatField::Area => stats.area,
            StatField::ConstructionArea => stats.construction_area,
            StatField::Floors => stats.floors,
            StatField::Units => stats.units,
            StatField::Residential => stats.residential,
            StatField::Commercial => stats.commercial,
            StatField::Owners => stats.owners,
            StatField::DisabledOwners => stats.disabled_owners,
            StatField::FemaleHeads => stats.female_heads,
            StatField::Retired => stats.retired,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatRange {
    pub min: u32,
    pub max: u32,
}

/// Min/max of every numeric field across both states of all buildings.
pub fn stat_ranges(buildings: &[Arc<Building>]) -> BTreeMap<StatField, StatRange> {
    let mut ranges = BTreeMap::new();

    for field in StatField::iter() {
        let values = buildings
            .iter()
            .flat_map(|b| [b.old_stats.as_ref(), b.new_stats.as_ref()])
            .flatten()
            .map(|stats| field.value(stats));

        let range = values.fold(None, |acc: Option<StatRange>, v| {
            Some(match acc {
                Some(r) => StatRange {
                    min: r.min.min(v),
                    max: r.max.max(v),
                },
                None => StatRange { min: v, max: v },
            })
        });

        if let Some(range) = range {
            ranges.insert(field, range);
        }
    }

    ranges
}

// ============================================================================
// Categories
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Categories {
    pub residential: bool,
    pub commercial: bool,
    /// At least half of the units are held by retirees
    pub retired: bool,
    pub disabled: bool,
}

impl Categories {
    pub fn of(stats: &BuildingStats) -> Self {
        Self {
            residential: stats.residential > stats.commercial,
            commercial: stats.commercial > stats.residential,
            retired: stats.units > 0 && u64::from(stats.retired) * 2 >= u64::from(stats.units),
            disabled: stats.disabled_owners > 0,
        }
    }

    pub fn of_building(building: &Building) -> Self {
        building.current_stats().map(Self::of).unwrap_or_default()
    }
}

/// Which categories are switched on. A building matches if it is in any of them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    pub residential: bool,
    pub commercial: bool,
    pub retired: bool,
    pub disabled: bool,
}

impl CategoryFilter {
    pub fn is_empty(&self) -> bool {
        !(self.residential || self.commercial || self.retired || self.disabled)
    }

    pub fn matches(&self, categories: Categories) -> bool {
        (self.residential && categories.residential)
            || (self.commercial && categories.commercial)
            || (self.retired && categories.retired)
            || (self.disabled && categories.disabled)
    }

    /// Split the units of all buildings into those matching the filter and the rest.
    ///
    /// An empty filter selects nothing.
    pub fn summarize(&self, buildings: &[Arc<Building>]) -> FilterSummary {
        let mut summary = FilterSummary::default();

        for building in buildings {
            let units = building.current_stats().map(|s| s.units).unwrap_or(0) as u64;

            if self.matches(Categories::of_building(building)) {
                summary.selected_units += units;
                summary.selected.push(SelectedBuilding {
                    id: building.id.clone(),
                    name: building.name.clone(),
                    units,
                });
            } else {
                summary.other_units += units;
            }
        }

        summary
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedBuilding {
    pub id: BuildingIdentifier,
    pub name: Arc<str>,
    pub units: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub selected_units: u64,
    pub other_units: u64,
    pub selected: Vec<SelectedBuilding>,
}
