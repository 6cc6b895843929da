//! A single gesture in flight.

use std::time::Duration;

use cgmath::{EuclideanSpace, MetricSpace, Point2};

use super::{TouchEvent, TouchId, TouchPoint};

/// Pinch distances below this value are treated as degenerate. Scales derived from such a
/// distance would explode, so the pinch reports a scale of `1.0` until the fingers separate.
pub const MIN_PINCH_DISTANCE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Began,
    InProgress,
    Ended,
}

impl GestureState {
    fn can_become(&self, next: GestureState) -> bool {
        matches!(
            (self, next),
            (GestureState::Began, GestureState::InProgress)
                | (GestureState::Began, GestureState::Ended)
                | (GestureState::InProgress, GestureState::InProgress)
                | (GestureState::InProgress, GestureState::Ended)
        )
    }
}

/// The touches a gesture is made of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Pan {
        touch: TouchPoint,
    },
    Pinch {
        first: TouchPoint,
        second: TouchPoint,
    },
}

impl Gesture {
    fn world_location(&self) -> Point2<f64> {
        match self {
            Gesture::Pan { touch } => touch.world_location,
            Gesture::Pinch { first, second } => {
                first.world_location.midpoint(second.world_location)
            }
        }
    }

    fn distance(&self) -> Option<f64> {
        match self {
            Gesture::Pan { .. } => None,
            Gesture::Pinch { first, second } => {
                Some(first.world_location.distance(second.world_location))
            }
        }
    }

    fn timestamp(&self) -> Duration {
        match self {
            Gesture::Pan { touch } => touch.timestamp,
            Gesture::Pinch { first, second } => first.timestamp.max(second.timestamp),
        }
    }

    pub fn contains(&self, id: TouchId) -> bool {
        match self {
            Gesture::Pan { touch } => touch.id == id,
            Gesture::Pinch { first, second } => first.id == id || second.id == id,
        }
    }

    fn touch_mut(&mut self, id: TouchId) -> Option<&mut TouchPoint> {
        match self {
            Gesture::Pan { touch } if touch.id == id => Some(touch),
            Gesture::Pinch { first, .. } if first.id == id => Some(first),
            Gesture::Pinch { second, .. } if second.id == id => Some(second),
            _ => None,
        }
    }
}

fn usable_distance(distance: Option<f64>) -> Option<f64> {
    distance.filter(|distance| *distance > MIN_PINCH_DISTANCE)
}

/// Tracks one pan or pinch gesture from its first recognized event until it ends.
///
/// Quantities prefixed with `previous_` refer to the last time the gesture was reported to a
/// listener, or to the gesture start if it has not been reported yet.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    gesture: Gesture,
    state: GestureState,

    start_world_location: Point2<f64>,
    start_distance: Option<f64>,

    previous_world_location: Point2<f64>,
    previous_distance: Option<f64>,
    previous_timestamp: Duration,
    dispatched: bool,
}

impl GestureRecognizer {
    pub fn pan(touch: TouchPoint) -> Self {
        Self::new(Gesture::Pan { touch })
    }

    /// Creates a pinch from two touches. Returns `None` if both touches have the same identity.
    pub fn pinch(first: TouchPoint, second: TouchPoint) -> Option<Self> {
        if first.id == second.id {
            return None;
        }
        Some(Self::new(Gesture::Pinch { first, second }))
    }

    fn new(gesture: Gesture) -> Self {
        let world_location = gesture.world_location();
        let distance = usable_distance(gesture.distance());
        let timestamp = gesture.timestamp();
        Self {
            gesture,
            state: GestureState::Began,
            start_world_location: world_location,
            start_distance: distance,
            previous_world_location: world_location,
            previous_distance: distance,
            previous_timestamp: timestamp,
            dispatched: false,
        }
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_pan(&self) -> bool {
        matches!(self.gesture, Gesture::Pan { .. })
    }

    pub fn is_pinch(&self) -> bool {
        matches!(self.gesture, Gesture::Pinch { .. })
    }

    pub fn contains(&self, id: TouchId) -> bool {
        self.gesture.contains(id)
    }

    /// World location of the pan touch, or the midpoint of the pinch touches.
    pub fn world_location(&self) -> Point2<f64> {
        self.gesture.world_location()
    }

    pub fn previous_world_location(&self) -> Point2<f64> {
        self.previous_world_location
    }

    pub fn start_world_location(&self) -> Point2<f64> {
        self.start_world_location
    }

    /// Distance travelled since the gesture started.
    pub fn displacement(&self) -> f64 {
        self.start_world_location.distance(self.world_location())
    }

    /// Current pinch distance relative to the distance when the pinch started.
    pub fn pinch_scale(&self) -> f64 {
        self.scale_relative_to(self.start_distance)
    }

    /// Current pinch distance relative to the distance at the previous report.
    pub fn pinch_scale_delta(&self) -> f64 {
        self.scale_relative_to(self.previous_distance)
    }

    fn scale_relative_to(&self, reference: Option<f64>) -> f64 {
        match (reference, usable_distance(self.gesture.distance())) {
            (Some(reference), Some(distance)) => distance / reference,
            _ => 1.0,
        }
    }

    pub fn pinch_center(&self) -> Point2<f64> {
        self.world_location()
    }

    /// Timestamp of the most recent sample of any touch in the gesture.
    pub fn timestamp(&self) -> Duration {
        self.gesture.timestamp()
    }

    /// Time between the most recent sample and the previous report.
    pub fn elapsed(&self) -> Duration {
        self.timestamp().saturating_sub(self.previous_timestamp)
    }

    pub(crate) fn has_dispatched(&self) -> bool {
        self.dispatched
    }

    /// Stores a new sample for one of the gesture's touches. Returns false for foreign touches.
    pub(crate) fn update_touch(&mut self, event: &TouchEvent, world_location: Point2<f64>) -> bool {
        let Some(touch) = self.gesture.touch_mut(event.id) else {
            return false;
        };
        touch.advance(event, world_location);

        if self.start_distance.is_none() {
            if let Some(distance) = usable_distance(self.gesture.distance()) {
                log::trace!("pinch left degenerate geometry at distance {distance}");
                self.start_distance = Some(distance);
                self.previous_distance = Some(distance);
            }
        }
        true
    }

    pub(crate) fn transition(&mut self, next: GestureState) -> bool {
        if !self.state.can_become(next) {
            log::warn!("ignoring gesture transition {:?} -> {next:?}", self.state);
            return false;
        }
        self.state = next;
        true
    }

    /// Marks the current sample as reported to the listener.
    pub(crate) fn commit(&mut self) {
        self.dispatched = true;
        self.previous_world_location = self.world_location();
        self.previous_timestamp = self.timestamp();
        if let Some(distance) = usable_distance(self.gesture.distance()) {
            self.previous_distance = Some(distance);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cgmath::Point2;

    use super::*;
    use crate::gesture::{TouchEvent, TouchPhase};

    fn touch(id: u64, x: f64, y: f64) -> TouchPoint {
        let event = TouchEvent::new(id, TouchPhase::Began, Point2::new(x, y), Duration::ZERO);
        TouchPoint::new(&event, event.location)
    }

    fn moved(id: u64, x: f64, y: f64, millis: u64) -> TouchEvent {
        TouchEvent::new(
            id,
            TouchPhase::Moved,
            Point2::new(x, y),
            Duration::from_millis(millis),
        )
    }

    #[test]
    fn pan_location_follows_touch() {
        let mut recognizer = GestureRecognizer::pan(touch(1, 10.0, 10.0));
        assert!(recognizer.update_touch(&moved(1, 25.0, 10.0, 16), Point2::new(25.0, 10.0)));

        assert_eq!(recognizer.world_location(), Point2::new(25.0, 10.0));
        assert_eq!(recognizer.previous_world_location(), Point2::new(10.0, 10.0));
        assert_eq!(recognizer.displacement(), 15.0);
        assert_eq!(recognizer.pinch_scale(), 1.0);
        assert_eq!(recognizer.elapsed(), Duration::from_millis(16));
    }

    #[test]
    fn pinch_reports_midpoint_and_scale() {
        let mut recognizer =
            GestureRecognizer::pinch(touch(1, 0.0, 0.0), touch(2, 100.0, 0.0)).unwrap();
        assert_eq!(recognizer.pinch_center(), Point2::new(50.0, 0.0));

        recognizer.update_touch(&moved(2, 200.0, 0.0, 16), Point2::new(200.0, 0.0));
        assert_eq!(recognizer.pinch_scale(), 2.0);
        assert_eq!(recognizer.pinch_scale_delta(), 2.0);
        assert_eq!(recognizer.world_location(), Point2::new(100.0, 0.0));

        recognizer.commit();
        recognizer.update_touch(&moved(2, 300.0, 0.0, 32), Point2::new(300.0, 0.0));
        assert_eq!(recognizer.pinch_scale(), 3.0);
        assert_eq!(recognizer.pinch_scale_delta(), 1.5);
    }

    #[test]
    fn pinch_requires_distinct_touches() {
        assert!(GestureRecognizer::pinch(touch(1, 0.0, 0.0), touch(1, 5.0, 0.0)).is_none());
    }

    #[test]
    fn degenerate_pinch_keeps_scale() {
        let mut recognizer =
            GestureRecognizer::pinch(touch(1, 50.0, 50.0), touch(2, 50.0, 50.0)).unwrap();
        assert_eq!(recognizer.pinch_scale(), 1.0);

        recognizer.update_touch(&moved(2, 50.5, 50.0, 16), Point2::new(50.5, 50.0));
        assert_eq!(recognizer.pinch_scale(), 1.0);

        // The first usable distance becomes the reference.
        recognizer.update_touch(&moved(2, 60.0, 50.0, 32), Point2::new(60.0, 50.0));
        assert_eq!(recognizer.pinch_scale(), 1.0);

        recognizer.update_touch(&moved(2, 70.0, 50.0, 48), Point2::new(70.0, 50.0));
        assert_eq!(recognizer.pinch_scale(), 2.0);
    }

    #[test]
    fn states_only_move_forward() {
        let mut recognizer = GestureRecognizer::pan(touch(1, 0.0, 0.0));
        assert_eq!(recognizer.state(), GestureState::Began);
        assert!(recognizer.transition(GestureState::InProgress));
        assert!(!recognizer.transition(GestureState::Began));
        assert!(recognizer.transition(GestureState::Ended));
        assert!(!recognizer.transition(GestureState::InProgress));
        assert_eq!(recognizer.state(), GestureState::Ended);
    }

    #[test]
    fn foreign_touches_are_rejected() {
        let mut recognizer = GestureRecognizer::pan(touch(1, 0.0, 0.0));
        assert!(!recognizer.update_touch(&moved(7, 5.0, 5.0, 16), Point2::new(5.0, 5.0)));
        assert_eq!(recognizer.world_location(), Point2::new(0.0, 0.0));
    }
}
