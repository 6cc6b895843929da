//! Turns raw touches into gesture callbacks.

use std::{collections::BTreeMap, time::Duration};

use cgmath::{MetricSpace, Point2};

use super::{
    GestureRecognizer, GestureSettings, GestureState, TouchEvent, TouchId, TouchPhase, TouchPoint,
};
use crate::coords::{CoordinateConverter, IdentityConverter};

/// Receives the gestures recognized by a [`GestureRecognizerLayer`].
///
/// Positions are in view space. All methods default to doing nothing.
pub trait GestureListener {
    /// A pan gesture started, moved or ended.
    fn scroll(&mut self, _recognizer: &GestureRecognizer) {}

    /// A pinch gesture started, moved or ended.
    fn zoom(&mut self, _recognizer: &GestureRecognizer) {}

    fn tap(&mut self, _position: Point2<f64>) {}

    fn long_tap_started(&mut self, _position: Point2<f64>) {}

    fn long_tap(&mut self, _position: Point2<f64>) {}
}

impl GestureListener for () {}

struct TrackedTouch {
    point: TouchPoint,
    start_world_location: Point2<f64>,
    exceeded_threshold: bool,
    pinched: bool,
    held: Duration,
    long_tap_started: bool,
    long_tap_fired: bool,
}

impl TrackedTouch {
    fn new(point: TouchPoint) -> Self {
        Self {
            point,
            start_world_location: point.world_location,
            exceeded_threshold: false,
            pinched: false,
            held: Duration::ZERO,
            long_tap_started: false,
            long_tap_fired: false,
        }
    }

    fn may_long_tap(&self) -> bool {
        !self.exceeded_threshold && !self.pinched
    }

    fn may_tap(&self) -> bool {
        self.may_long_tap() && !self.long_tap_started
    }
}

/// Owns the active touches and classifies them into pans, pinches, taps and long-taps.
///
/// Touch events are fed through [`GestureRecognizerLayer::process_touch`] and time is advanced
/// through [`GestureRecognizerLayer::update`]. Both report to the listener passed along.
pub struct GestureRecognizerLayer {
    settings: GestureSettings,
    converter: Box<dyn CoordinateConverter>,
    touches: BTreeMap<TouchId, TrackedTouch>,
    recognizer: Option<GestureRecognizer>,
}

impl Default for GestureRecognizerLayer {
    fn default() -> Self {
        Self::new(GestureSettings::default())
    }
}

impl GestureRecognizerLayer {
    pub fn new(settings: GestureSettings) -> Self {
        Self::with_converter(settings, IdentityConverter)
    }

    pub fn with_converter(
        settings: GestureSettings,
        converter: impl CoordinateConverter + 'static,
    ) -> Self {
        Self {
            settings,
            converter: Box::new(converter),
            touches: BTreeMap::new(),
            recognizer: None,
        }
    }

    pub fn settings(&self) -> &GestureSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut GestureSettings {
        &mut self.settings
    }

    pub fn set_converter(&mut self, converter: impl CoordinateConverter + 'static) {
        self.set_boxed_converter(Box::new(converter));
    }

    pub(crate) fn set_boxed_converter(&mut self, converter: Box<dyn CoordinateConverter>) {
        self.converter = converter;
    }

    /// The gesture which is currently being tracked, if any.
    pub fn recognizer(&self) -> Option<&GestureRecognizer> {
        self.recognizer.as_ref()
    }

    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }

    /// Process a single touch sample.
    pub fn process_touch<L>(&mut self, event: &TouchEvent, listener: &mut L)
    where
        L: GestureListener + ?Sized,
    {
        let world_location = self.converter.screen_to_view(event.location);
        match event.phase {
            TouchPhase::Began => self.touch_began(event, world_location, listener),
            TouchPhase::Moved => self.touch_moved(event, world_location, listener),
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touch_ended(event, world_location, listener)
            }
        }
    }

    /// Advances the long-tap timers by `dt`.
    pub fn update<L>(&mut self, dt: Duration, listener: &mut L)
    where
        L: GestureListener + ?Sized,
    {
        // Long-taps are single finger gestures.
        if self.touches.len() != 1 {
            return;
        }

        let start_duration = self.settings.long_tap_start_duration;
        let trigger_duration = self.settings.long_tap_trigger_duration();

        for tracked in self.touches.values_mut() {
            if !tracked.may_long_tap() {
                continue;
            }
            tracked.held += dt;

            if !tracked.long_tap_started && tracked.held >= start_duration {
                tracked.long_tap_started = true;
                log::debug!("long-tap started for {:?}", tracked.point.id);
                listener.long_tap_started(tracked.point.world_location);
            }

            if !tracked.long_tap_fired && tracked.held >= trigger_duration {
                tracked.long_tap_fired = true;
                log::debug!("long-tap for {:?}", tracked.point.id);
                listener.long_tap(tracked.point.world_location);
            }
        }
    }

    /// Forgets every touch. A gesture which was already reported is ended properly first.
    pub fn cancel_all<L>(&mut self, listener: &mut L)
    where
        L: GestureListener + ?Sized,
    {
        if let Some(recognizer) = self.recognizer.take() {
            Self::finish(recognizer, listener);
        }
        self.touches.clear();
    }

    fn touch_began<L>(&mut self, event: &TouchEvent, world_location: Point2<f64>, listener: &mut L)
    where
        L: GestureListener + ?Sized,
    {
        if self.touches.contains_key(&event.id) {
            log::debug!("ignoring repeated begin of {:?}", event.id);
            return;
        }
        if self.touches.len() >= 2 {
            log::debug!("ignoring additional touch {:?}", event.id);
            return;
        }

        let point = TouchPoint::new(event, world_location);
        let mut tracked = TrackedTouch::new(point);

        if let Some(previous) = self.recognizer.take() {
            Self::finish(previous, listener);
        }

        self.recognizer = match self.touches.values_mut().next() {
            Some(first) => {
                first.pinched = true;
                tracked.pinched = true;
                log::debug!("pinch began with {:?} and {:?}", first.point.id, event.id);
                GestureRecognizer::pinch(first.point, point)
            }
            None => Some(GestureRecognizer::pan(point)),
        };

        self.touches.insert(event.id, tracked);
    }

    fn touch_moved<L>(&mut self, event: &TouchEvent, world_location: Point2<f64>, listener: &mut L)
    where
        L: GestureListener + ?Sized,
    {
        let Some(tracked) = self.touches.get_mut(&event.id) else {
            log::debug!("ignoring move of untracked {:?}", event.id);
            return;
        };

        tracked.point.advance(event, world_location);
        if !tracked.exceeded_threshold
            && tracked.start_world_location.distance(world_location)
                > self.settings.scroll_start_threshold
        {
            tracked.exceeded_threshold = true;
        }

        let Some(recognizer) = self.recognizer.as_mut() else {
            return;
        };
        if !recognizer.update_touch(event, world_location) {
            return;
        }

        if recognizer.is_pan()
            && !recognizer.has_dispatched()
            && recognizer.displacement() <= self.settings.scroll_start_threshold
        {
            return;
        }

        if recognizer.has_dispatched() {
            recognizer.transition(GestureState::InProgress);
        }
        Self::dispatch(recognizer, listener);
        recognizer.commit();
    }

    fn touch_ended<L>(&mut self, event: &TouchEvent, world_location: Point2<f64>, listener: &mut L)
    where
        L: GestureListener + ?Sized,
    {
        let Some(mut tracked) = self.touches.remove(&event.id) else {
            log::debug!("ignoring lift of untracked {:?}", event.id);
            return;
        };
        tracked.point.advance(event, world_location);

        if let Some(mut recognizer) = self.recognizer.take() {
            if recognizer.contains(event.id) {
                recognizer.update_touch(event, world_location);
                let was_pinch = recognizer.is_pinch();
                Self::finish(recognizer, listener);

                // The finger left on the screen carries on as a pan.
                if was_pinch {
                    self.recognizer = self
                        .touches
                        .values()
                        .next()
                        .map(|remaining| GestureRecognizer::pan(remaining.point));
                }
            } else {
                self.recognizer = Some(recognizer);
            }
        }

        if event.phase == TouchPhase::Ended
            && tracked.may_tap()
            && tracked.start_world_location.distance(world_location)
                <= self.settings.scroll_start_threshold
        {
            log::debug!("tap of {:?}", event.id);
            listener.tap(world_location);
        }
    }

    fn finish<L>(mut recognizer: GestureRecognizer, listener: &mut L)
    where
        L: GestureListener + ?Sized,
    {
        // Listeners never hear about the end of a gesture they never saw begin.
        if !recognizer.has_dispatched() {
            return;
        }
        if recognizer.transition(GestureState::Ended) {
            Self::dispatch(&recognizer, listener);
        }
    }

    fn dispatch<L>(recognizer: &GestureRecognizer, listener: &mut L)
    where
        L: GestureListener + ?Sized,
    {
        log::trace!(
            "gesture {:?} at {:?}",
            recognizer.state(),
            recognizer.world_location()
        );
        if recognizer.is_pan() {
            listener.scroll(recognizer);
        } else {
            listener.zoom(recognizer);
        }
    }
}
