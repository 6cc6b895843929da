//! Touch tracking and gesture recognition.
//!
//! Raw touches are fed into a [`GestureRecognizerLayer`] which classifies them into pan and pinch
//! gestures and reports semantic events to a [`GestureListener`].

use std::time::Duration;

use cgmath::Point2;

pub use layer::{GestureListener, GestureRecognizerLayer};
pub use recognizer::{Gesture, GestureRecognizer, GestureState, MIN_PINCH_DISTANCE};
pub use settings::GestureSettings;

mod layer;
mod recognizer;
mod settings;

/// Stable identity of a touch, as reported by the host input system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TouchId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

impl TouchPhase {
    /// Cancellation finalizes gestures exactly like a lift.
    pub fn is_finished(&self) -> bool {
        matches!(self, TouchPhase::Ended | TouchPhase::Cancelled)
    }
}

/// A single touch sample delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub id: TouchId,
    pub phase: TouchPhase,
    /// Position in screen space.
    pub location: Point2<f64>,
    /// Time of the sample, measured from an arbitrary but fixed epoch.
    pub timestamp: Duration,
}

impl TouchEvent {
    pub fn new(id: u64, phase: TouchPhase, location: Point2<f64>, timestamp: Duration) -> Self {
        Self {
            id: TouchId(id),
            phase,
            location,
            timestamp,
        }
    }
}

/// A tracked touch with its current and previous sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: TouchId,
    pub phase: TouchPhase,
    pub location: Point2<f64>,
    pub previous_location: Point2<f64>,
    pub world_location: Point2<f64>,
    pub previous_world_location: Point2<f64>,
    pub timestamp: Duration,
    pub previous_timestamp: Duration,
}

impl TouchPoint {
    pub fn new(event: &TouchEvent, world_location: Point2<f64>) -> Self {
        Self {
            id: event.id,
            phase: event.phase,
            location: event.location,
            previous_location: event.location,
            world_location,
            previous_world_location: world_location,
            timestamp: event.timestamp,
            previous_timestamp: event.timestamp,
        }
    }

    /// Shifts the current sample into the previous one and stores the new sample.
    pub fn advance(&mut self, event: &TouchEvent, world_location: Point2<f64>) {
        self.previous_location = self.location;
        self.previous_world_location = self.world_location;
        self.previous_timestamp = self.timestamp;

        self.phase = event.phase;
        self.location = event.location;
        self.world_location = world_location;
        // Hosts occasionally deliver out of order timestamps, never go backwards.
        self.timestamp = event.timestamp.max(self.timestamp);
    }
}
