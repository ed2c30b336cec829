//! Resolves trips and launches them as staggered batches.

use std::collections::HashMap;
use std::sync::Arc;

use city_replay_dataset::{
    BuildingIdentifier, DatasetError, DatasetProvider, DateRange, parse_trip_date,
};
use geo::Point;
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{self, Instant};
use tracing::{debug, info};

use crate::animator::{Trip, TripAnimator, TripState};
use crate::camera::fit_to_points;
use crate::cancel::CancelToken;
use crate::config::ReplayConfig;
use crate::context::AnimationContext;
use crate::progress::{BatchId, BatchScope, LookupError, ProgressEvent, ProgressStream};

/// A launched batch and its progress events.
pub struct Playback {
    pub id: BatchId,
    pub progress: ProgressStream,
}

/// A building's trips, sorted by date.
pub fn trips_for_building(
    dataset: &dyn DatasetProvider,
    id: &BuildingIdentifier,
) -> Result<Vec<Trip>, LookupError> {
    let building = dataset
        .building(id)
        .ok_or_else(|| LookupError::BuildingNotFound(id.clone()))?;
    let site = dataset
        .waste_site_for(&building)
        .ok_or_else(|| LookupError::WasteSiteNotFound(building.waste_site_id.clone()))?;

    Ok(building
        .sorted_trips()
        .into_iter()
        .map(|date| Trip::new(building.clone(), site.clone(), date))
        .collect())
}

/// Every trip of every building whose date lies in `[from, to]`, sorted by date.
///
/// Buildings whose waste site cannot be resolved are skipped, as are trip
/// dates that do not parse.
pub fn collect_trips_in_range(
    dataset: &dyn DatasetProvider,
    from: &str,
    to: &str,
) -> Result<Vec<Trip>, LookupError> {
    let range = DateRange::parse(from, to).map_err(|err| match err {
        DatasetError::InvalidDate(date) => LookupError::InvalidDate(date),
        other => LookupError::InvalidDate(other.to_string()),
    })?;

    let mut trips = Vec::new();
    for building in dataset.all_buildings() {
        let Some(site) = dataset.waste_site_for(&building) else {
            debug!(
                "Skipping {}: waste site {} not loaded",
                building.id, building.waste_site_id
            );
            continue;
        };

        for date in &building.trips {
            let in_range = parse_trip_date(date).is_ok_and(|d| range.contains(d));
            if in_range {
                trips.push(Trip::new(building.clone(), site.clone(), date.clone()));
            }
        }
    }

    trips.sort_by(|a, b| a.date.cmp(&b.date));
    Ok(trips)
}

pub struct TripScheduler {
    dataset: Arc<dyn DatasetProvider>,
    context: Arc<AnimationContext>,
    animator: TripAnimator,
    config: ReplayConfig,
    active: Arc<Mutex<HashMap<BatchId, CancelToken>>>,
}

impl TripScheduler {
    pub fn new(
        dataset: Arc<dyn DatasetProvider>,
        context: Arc<AnimationContext>,
        config: ReplayConfig,
    ) -> Self {
        Self {
            dataset,
            animator: TripAnimator::from_config(context.clone(), &config),
            context,
            config,
            active: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    pub fn context(&self) -> &Arc<AnimationContext> {
        &self.context
    }

    /// Replay every trip of one building, one launch per stagger interval.
    ///
    /// Must be called from within a tokio runtime.
    pub fn play_for_building(&self, id: &BuildingIdentifier) -> Playback {
        let batch = BatchId::next();
        let (tx, progress) = ProgressStream::channel();

        match trips_for_building(&*self.dataset, id) {
            Err(err) => {
                let _ = tx.send(ProgressEvent::Failed(err));
            }
            Ok(trips) if trips.is_empty() => {
                let _ = tx.send(ProgressEvent::NoTrips(id.clone()));
            }
            Ok(trips) => {
                let _ = tx.send(ProgressEvent::BatchStarted {
                    scope: BatchScope::Building(trips[0].building.name.clone()),
                    count: trips.len(),
                    stagger_ms: self.config.stagger_ms,
                });

                let presentation = self.context.presentation();
                fit_to_points(
                    presentation.as_deref(),
                    [trips[0].building.location, trips[0].waste_site.location],
                    &self.config.building_camera,
                );

                self.launch(batch, trips, tx);
            }
        }

        Playback { id: batch, progress }
    }

    /// Replay the trips of all buildings between two ISO dates, inclusive.
    ///
    /// Must be called from within a tokio runtime.
    pub fn play_for_range(&self, from: &str, to: &str) -> Playback {
        let batch = BatchId::next();
        let (tx, progress) = ProgressStream::channel();

        match collect_trips_in_range(&*self.dataset, from, to) {
            Err(err) => {
                let _ = tx.send(ProgressEvent::Failed(err));
            }
            Ok(trips) if trips.is_empty() => {
                let _ = tx.send(ProgressEvent::NoneInRange {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
            Ok(trips) => {
                let _ = tx.send(ProgressEvent::BatchStarted {
                    scope: BatchScope::Range {
                        from: from.to_string(),
                        to: to.to_string(),
                    },
                    count: trips.len(),
                    stagger_ms: self.config.stagger_ms,
                });

                let points: Vec<Point> = trips
                    .iter()
                    .flat_map(|t| [t.building.location, t.waste_site.location])
                    .collect();
                let presentation = self.context.presentation();
                fit_to_points(presentation.as_deref(), points, &self.config.range_camera);

                self.launch(batch, trips, tx);
            }
        }

        Playback { id: batch, progress }
    }

    /// Stop one batch: no further launches, running markers removed. Returns
    /// `false` if the batch already finished.
    pub fn cancel(&self, batch: BatchId) -> bool {
        match self.active.lock().get(&batch) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn stop_all(&self) {
        for token in self.active.lock().values() {
            token.cancel();
        }
    }

    pub fn active_batches(&self) -> Vec<BatchId> {
        let mut batches: Vec<_> = self.active.lock().keys().copied().collect();
        batches.sort();
        batches
    }

    fn launch(&self, batch: BatchId, trips: Vec<Trip>, tx: UnboundedSender<ProgressEvent>) {
        let token = CancelToken::new();
        self.active.lock().insert(batch, token.clone());

        let started = Instant::now();
        let animator = self.animator.clone();
        let config = self.config.clone();
        let active = self.active.clone();

        tokio::spawn(async move {
            let total = trips.len();
            let mut handles = Vec::with_capacity(total);

            for (index, trip) in trips.into_iter().enumerate() {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = time::sleep_until(started + config.launch_offset(index)) => {}
                }

                info!("{batch}: launching {trip}");
                let _ = tx.send(ProgressEvent::TripLaunched {
                    index,
                    trip: trip.clone(),
                });
                handles.push(animator.start_with_token(&trip, config.trip_duration(), token.clone()));
            }

            // Trips that never launched count as cancelled
            let mut completed = 0;
            let mut cancelled = total - handles.len();
            for handle in &mut handles {
                match handle.finished().await {
                    TripState::Completed => completed += 1,
                    TripState::Cancelled => cancelled += 1,
                    TripState::Pending | TripState::Running => {}
                }
            }

            active.lock().remove(&batch);
            debug!("{batch}: {completed} completed, {cancelled} cancelled");
            let _ = tx.send(ProgressEvent::BatchFinished {
                completed,
                cancelled,
            });
        });
    }
}
