//! Moves one truck marker from a building to its waste site.
//!
//! Each trip is a tokio task ticking a fixed number of steps over the trip
//! duration. The marker exists in the shared truck collection exactly while
//! the task runs.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use city_replay_dataset::{Building, WasteSite};
use geo::Point;
use tokio::sync::watch;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::config::ReplayConfig;
use crate::context::AnimationContext;
use crate::geometry::{distance, lerp_point};
use crate::trucks::{Truck, TruckId};

/// tokio intervals cannot tick with a zero period
const MIN_TICK: Duration = Duration::from_millis(1);

/// One dated trip between a building and its waste site.
#[derive(Clone, Debug)]
pub struct Trip {
    pub building: Arc<Building>,
    pub waste_site: Arc<WasteSite>,
    pub date: Arc<str>,
}

impl Trip {
    pub fn new(building: Arc<Building>, waste_site: Arc<WasteSite>, date: Arc<str>) -> Self {
        Self {
            building,
            waste_site,
            date,
        }
    }

    pub fn label(&self) -> String {
        format!(
            "{} → {} ({})",
            self.building.name, self.waste_site.name, self.date
        )
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TripState {
    /// Resolved but not handed to the animator yet. Handles returned by
    /// [`TripAnimator::start`] are already past this state.
    Pending,
    Running,
    Completed,
    Cancelled,
}

impl TripState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TripState::Completed | TripState::Cancelled)
    }
}

/// Handle to a started trip. Dropping it does not stop the trip.
pub struct TripHandle {
    truck: Option<TruckId>,
    state: watch::Receiver<TripState>,
    cancel: CancelToken,
}

impl TripHandle {
    /// A handle for a trip that never got a task.
    fn settled(state: TripState, cancel: CancelToken) -> Self {
        let (_tx, rx) = watch::channel(state);
        Self {
            truck: None,
            state: rx,
            cancel,
        }
    }

    /// The marker driven by this trip; `None` if nothing was animated.
    pub fn truck_id(&self) -> Option<TruckId> {
        self.truck
    }

    pub fn state(&self) -> TripState {
        *self.state.borrow()
    }

    /// Stop the trip and remove its marker. Trips started with the same token stop too.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for `Completed` or `Cancelled`.
    pub async fn finished(&mut self) -> TripState {
        let result = self.state.wait_for(TripState::is_terminal).await.map(|s| *s);
        match result {
            Ok(state) => state,
            // The task is gone; whatever it last reported is final
            Err(_) => *self.state.borrow(),
        }
    }
}

#[derive(Clone)]
pub struct TripAnimator {
    context: Arc<AnimationContext>,
    steps: u32,
}

impl TripAnimator {
    pub fn new(context: Arc<AnimationContext>, steps: u32) -> Self {
        Self {
            context,
            steps: steps.max(1),
        }
    }

    pub fn from_config(context: Arc<AnimationContext>, config: &ReplayConfig) -> Self {
        Self::new(context, config.steps)
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn start(&self, trip: &Trip, duration: Duration) -> TripHandle {
        self.start_with_token(trip, duration, CancelToken::new())
    }

    /// Must be called from within a tokio runtime.
    pub fn start_with_token(&self, trip: &Trip, duration: Duration, cancel: CancelToken) -> TripHandle {
        if !self.context.has_presentation() {
            warn!("No presentation attached; skipping trip {trip}");
            return TripHandle::settled(TripState::Completed, cancel);
        }
        if cancel.is_cancelled() {
            return TripHandle::settled(TripState::Cancelled, cancel);
        }

        self.context.ensure_route(&trip.building, &trip.waste_site);

        let start = trip.building.location;
        let end = trip.waste_site.location;
        info!(
            "{} -> {} ({}) ~ {:.1} m",
            trip.building.name,
            trip.waste_site.name,
            trip.date,
            distance(start, end)
        );

        let id = TruckId::next();
        self.context.add_truck(Truck {
            id,
            position: start,
            label: trip.label(),
        });
        let (state_tx, state_rx) = watch::channel(TripState::Running);

        let period = (duration / self.steps).max(MIN_TICK);
        tokio::spawn(run_trip(
            self.context.clone(),
            id,
            (start, end),
            self.steps,
            period,
            cancel.clone(),
            state_tx,
        ));

        TripHandle {
            truck: Some(id),
            state: state_rx,
            cancel,
        }
    }
}

async fn run_trip(
    context: Arc<AnimationContext>,
    id: TruckId,
    (start, end): (Point, Point),
    steps: u32,
    period: Duration,
    cancel: CancelToken,
    state: watch::Sender<TripState>,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    let mut step = 0u32;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                context.remove_truck(id);
                debug!("{id} cancelled after {step} of {steps} steps");
                state.send_replace(TripState::Cancelled);
                return;
            }
            _ = ticker.tick() => {}
        }

        step += 1;
        let t = step as f64 / steps as f64;
        if t >= 1.0 {
            context.remove_truck(id);
            state.send_replace(TripState::Completed);
            return;
        }

        context.move_truck(id, lerp_point(start, end, t));
    }
}
