//! Replays waste-collection trips as animated truck markers.
//!
//! A [`TripScheduler`] resolves trips from a dataset and launches them as
//! staggered batches. Each trip is driven by the [`TripAnimator`], which moves
//! one marker along the route in the shared [`AnimationContext`]. Drawing is
//! delegated to whatever [`Presentation`] is attached.

pub mod animator;
pub mod camera;
pub mod cancel;
pub mod config;
pub mod context;
pub mod geometry;
pub mod presentation;
pub mod progress;
pub mod routes;
pub mod scheduler;
pub mod trucks;

#[cfg(test)]
mod testing;

// Re-export the dataset crate
pub use city_replay_dataset as dataset;

pub use animator::{Trip, TripAnimator, TripHandle, TripState};
pub use cancel::CancelToken;
pub use config::{CameraPreset, ConfigError, ReplayConfig};
pub use context::AnimationContext;
pub use geometry::Bounds;
pub use presentation::{LayerKind, LayerSpec, Presentation};
pub use progress::{BatchId, BatchScope, LookupError, ProgressEvent, ProgressStream};
pub use routes::{Route, RouteKey, RouteRegistry};
pub use scheduler::{Playback, TripScheduler, collect_trips_in_range, trips_for_building};
pub use trucks::{Truck, TruckCollection, TruckId};
