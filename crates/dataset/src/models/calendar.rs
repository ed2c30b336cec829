//! Trip dates, inclusive date ranges and the timeline behind the date slider.

use chrono::{Duration, NaiveDate};

use crate::models::types::{Building, DatasetError, Result};

/// Resolution of the two slider handles (0..=SLIDER_MAX).
pub const SLIDER_MAX: u16 = 1000;

/// Parse an ISO `YYYY-MM-DD` trip date.
pub fn parse_trip_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| DatasetError::InvalidDate(s.to_string()))
}

/// Inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn parse(from: &str, to: &str) -> Result<Self> {
        Ok(Self::new(parse_trip_date(from)?, parse_trip_date(to)?))
    }

    /// A reversed range contains nothing.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}

/// Extent of all trip dates, mapped onto a 0..1 track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timeline {
    pub min: NaiveDate,
    pub max: NaiveDate,
    /// Every parseable trip date, one entry per trip (duplicates kept for the dots)
    pub dates: Vec<NaiveDate>,
}

impl Timeline {
    /// `None` when no building has a parseable trip date.
    pub fn from_buildings<'a>(buildings: impl IntoIterator<Item = &'a Building>) -> Option<Self> {
        let dates: Vec<NaiveDate> = buildings
            .into_iter()
            .flat_map(|b| b.trips.iter())
            .filter_map(|d| parse_trip_date(d).ok())
            .collect();

        let min = *dates.iter().min()?;
        let max = *dates.iter().max()?;

        Some(Self { min, max, dates })
    }

    pub fn span_days(&self) -> i64 {
        (self.max - self.min).num_days()
    }

    /// Linear interpolation between `min` and `max`, truncated to whole days.
    pub fn date_at(&self, fraction: f64) -> NaiveDate {
        let days = (self.span_days() as f64 * fraction).floor() as i64;
        self.min + Duration::days(days)
    }

    /// Position of a date on the track. A single-day timeline puts everything at 0.
    pub fn fraction_of(&self, date: NaiveDate) -> f64 {
        let span = self.span_days();
        if span == 0 {
            return 0.0;
        }
        (date - self.min).num_days() as f64 / span as f64
    }

    /// The range selected by two slider handles; crossed handles are swapped.
    pub fn selection(&self, a: u16, b: u16) -> DateRange {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo = lo.min(SLIDER_MAX);
        let hi = hi.min(SLIDER_MAX);

        DateRange::new(
            self.date_at(lo as f64 / SLIDER_MAX as f64),
            self.date_at(hi as f64 / SLIDER_MAX as f64),
        )
    }
}
