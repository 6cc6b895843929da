//! Scroll, zoom and deceleration physics.

use std::time::Duration;

use cgmath::{EuclideanSpace, InnerSpace, Point2, Vector2, Zero};

use super::settings::{MapLayerSettings, ZoomType};
use crate::{
    coords::NodeTransform,
    gesture::{GestureRecognizer, GestureState},
    util::math::clamp_offset,
};

/// Frame rate the decelerate multiplicator is expressed in. The decay is applied as
/// `multiplicator ^ (dt * REFERENCE_FRAME_RATE)` which keeps it independent of the real frame rate.
pub const REFERENCE_FRAME_RATE: f64 = 60.0;

/// A pan released after resting this long does not glide.
pub const VELOCITY_STALE_AFTER: Duration = Duration::from_millis(100);

/// Current scroll offset, scale and momentum of a map layer.
///
/// A layer point `p` is shown at view point `p * scale - offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub offset: Vector2<f64>,
    pub scale: f64,
    /// Change of the offset per second while decelerating.
    pub velocity: Vector2<f64>,
    pub decelerating: bool,
}

pub(crate) struct MotionController {
    pub(crate) settings: MapLayerSettings,
    layer_size: Vector2<f64>,
    viewport_size: Vector2<f64>,
    state: MotionState,
    /// Velocity of the last scroll sample, seeds the deceleration.
    scroll_velocity: Vector2<f64>,
    /// Timestamp of the last scroll sample which moved.
    last_movement: Duration,
}

impl MotionController {
    pub fn new(
        settings: MapLayerSettings,
        layer_size: Vector2<f64>,
        viewport_size: Vector2<f64>,
    ) -> Self {
        let mut controller = Self {
            settings,
            layer_size,
            viewport_size,
            state: MotionState {
                offset: Vector2::zero(),
                scale: 1.0,
                velocity: Vector2::zero(),
                decelerating: false,
            },
            scroll_velocity: Vector2::zero(),
            last_movement: Duration::ZERO,
        };
        controller.clamp();
        controller
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn layer_size(&self) -> Vector2<f64> {
        self.layer_size
    }

    pub fn viewport_size(&self) -> Vector2<f64> {
        self.viewport_size
    }

    pub fn transform(&self) -> NodeTransform {
        NodeTransform {
            translation: -self.state.offset,
            scale: self.state.scale,
        }
    }

    pub fn view_to_layer(&self, view: Point2<f64>) -> Point2<f64> {
        Point2::from_vec((view.to_vec() + self.state.offset) / self.state.scale)
    }

    fn viewport_center(&self) -> Point2<f64> {
        Point2::from_vec(self.viewport_size / 2.0)
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        // Not `f64::clamp`, an inverted range must not panic.
        scale
            .max(self.settings.zoom_min_scale)
            .min(self.settings.zoom_max_scale)
    }

    fn clamp(&mut self) {
        self.state.scale = self.clamp_scale(self.state.scale);
        self.state.offset = clamp_offset(
            self.state.offset,
            self.layer_size * self.state.scale,
            self.viewport_size,
        );
    }

    pub fn resize(&mut self, viewport_size: Vector2<f64>) {
        self.viewport_size = viewport_size;
        self.clamp();
    }

    pub fn set_layer_size(&mut self, layer_size: Vector2<f64>) {
        self.layer_size = layer_size;
        self.clamp();
    }

    pub fn scroll_to(&mut self, offset: Vector2<f64>) {
        self.state.offset = offset;
        self.clamp();
    }

    pub fn set_scale(&mut self, scale: f64) {
        let center = self.viewport_center();
        self.zoom_around(scale, center);
    }

    pub fn stop_deceleration(&mut self) {
        if self.state.decelerating {
            log::debug!("deceleration stopped at {:?}", self.state.velocity);
        }
        self.state.velocity = Vector2::zero();
        self.state.decelerating = false;
    }

    pub fn scroll(&mut self, recognizer: &GestureRecognizer) {
        if !self.settings.zoom_and_scroll_allowed {
            return;
        }

        let now = recognizer.timestamp();
        if recognizer.state() == GestureState::Began {
            self.stop_deceleration();
            self.scroll_velocity = Vector2::zero();
            self.last_movement = now;
        }

        let delta = (recognizer.world_location() - recognizer.previous_world_location())
            * self.settings.scroll_speed_multiplicator;
        self.scroll_to(self.state.offset - delta);

        if delta.magnitude2() > 0.0 {
            self.last_movement = now;
            let elapsed = recognizer.elapsed();
            if elapsed > Duration::ZERO {
                self.scroll_velocity = -delta / elapsed.as_secs_f64();
            }
        } else if now.saturating_sub(self.last_movement) > VELOCITY_STALE_AFTER {
            // Samples which report a resting finger must not keep the old velocity alive.
            self.scroll_velocity = Vector2::zero();
        }

        if recognizer.state() == GestureState::Ended {
            self.start_deceleration();
        }
    }

    fn start_deceleration(&mut self) {
        let mut velocity = self.scroll_velocity;
        self.scroll_velocity = Vector2::zero();

        if !self.settings.decelerate_enabled {
            return;
        }

        let speed = velocity.magnitude();
        let cap = self.settings.decelerate_scroll_speed_cap;
        if speed > cap {
            velocity *= cap / speed;
        }

        if velocity.magnitude() < self.settings.decelerate_stop_threshold
            || velocity.magnitude2() == 0.0
        {
            return;
        }

        log::debug!("deceleration started with {velocity:?}");
        self.state.velocity = velocity;
        self.state.decelerating = true;
    }

    pub fn zoom(&mut self, recognizer: &GestureRecognizer) {
        if !self.settings.zoom_and_scroll_allowed {
            return;
        }

        if recognizer.state() == GestureState::Began {
            self.stop_deceleration();
        }

        let factor =
            1.0 + (recognizer.pinch_scale_delta() - 1.0) * self.settings.zoom_speed_multiplicator;
        let anchor = match self.settings.zoom_type {
            ZoomType::ViewCenterFixed => self.viewport_center(),
            ZoomType::PinchCenterFixed => recognizer.pinch_center(),
        };
        self.zoom_around(self.state.scale * factor, anchor);
    }

    /// Scales the layer while keeping the layer point under `anchor` at the same view position.
    fn zoom_around(&mut self, scale: f64, anchor: Point2<f64>) {
        let previous_scale = self.state.scale;
        let scale = self.clamp_scale(scale);

        let anchor = anchor.to_vec();
        let layer_point = (self.state.offset + anchor) / previous_scale;
        self.state.offset = layer_point * scale - anchor;
        self.state.scale = scale;
        self.clamp();

        log::trace!("zoom: {scale}");
    }

    /// Advances the deceleration by `dt`.
    pub fn update(&mut self, dt: Duration) {
        if !self.settings.zoom_and_scroll_allowed {
            self.stop_deceleration();
            return;
        }

        // Settings may have changed since the last frame.
        self.clamp();

        if !self.state.decelerating {
            return;
        }

        let dt = dt.as_secs_f64();
        let proposed = self.state.offset + self.state.velocity * dt;
        let clamped = clamp_offset(
            proposed,
            self.layer_size * self.state.scale,
            self.viewport_size,
        );

        // Stop dead at the edges.
        if clamped.x != proposed.x {
            self.state.velocity.x = 0.0;
        }
        if clamped.y != proposed.y {
            self.state.velocity.y = 0.0;
        }
        self.state.offset = clamped;

        self.state.velocity *= self
            .settings
            .decelerate_multiplicator
            .powf(dt * REFERENCE_FRAME_RATE);

        if self.state.velocity.magnitude() < self.settings.decelerate_stop_threshold {
            self.stop_deceleration();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cgmath::{InnerSpace, Vector2};

    use super::MotionController;
    use crate::map_layer::settings::MapLayerSettings;

    fn controller() -> MotionController {
        MotionController::new(
            MapLayerSettings::default(),
            Vector2::new(2000.0, 2000.0),
            Vector2::new(800.0, 600.0),
        )
    }

    #[test]
    fn starts_clamped() {
        let small = MotionController::new(
            MapLayerSettings::default(),
            Vector2::new(400.0, 1000.0),
            Vector2::new(800.0, 600.0),
        );
        assert_eq!(small.state().offset, Vector2::new(-200.0, 0.0));
        assert_eq!(small.state().scale, 1.0);
    }

    #[test]
    fn set_scale_keeps_center() {
        let mut controller = controller();
        controller.scroll_to(Vector2::new(500.0, 500.0));
        let center = controller.view_to_layer(cgmath::Point2::new(400.0, 300.0));

        controller.set_scale(2.0);
        assert_eq!(controller.state().scale, 2.0);
        let after = controller.view_to_layer(cgmath::Point2::new(400.0, 300.0));
        assert!((center.x - after.x).abs() < 1e-9);
        assert!((center.y - after.y).abs() < 1e-9);

        controller.set_scale(100.0);
        assert_eq!(controller.state().scale, 3.0);
        controller.set_scale(0.01);
        assert_eq!(controller.state().scale, 0.5);
    }

    #[test]
    fn deceleration_stops_at_edge() {
        let mut controller = controller();
        controller.scroll_to(Vector2::new(10.0, 500.0));
        controller.state.velocity = Vector2::new(-1000.0, 100.0);
        controller.state.decelerating = true;

        controller.update(Duration::from_millis(16));
        assert_eq!(controller.state().offset.x, 0.0);
        assert_eq!(controller.state().velocity.x, 0.0);
        assert!(controller.state().velocity.y > 0.0);
        assert!(controller.state().decelerating);
    }

    #[test]
    fn zero_dt_changes_nothing() {
        let mut controller = controller();
        controller.scroll_to(Vector2::new(300.0, 300.0));
        controller.state.velocity = Vector2::new(400.0, -300.0);
        controller.state.decelerating = true;

        let before = *controller.state();
        controller.update(Duration::ZERO);
        assert_eq!(*controller.state(), before);
    }

    #[test]
    fn disallowed_stops_momentum() {
        let mut controller = controller();
        controller.state.velocity = Vector2::new(400.0, 0.0);
        controller.state.decelerating = true;
        controller.settings.zoom_and_scroll_allowed = false;

        controller.update(Duration::from_millis(16));
        assert!(!controller.state().decelerating);
        assert_eq!(controller.state().velocity.magnitude(), 0.0);
    }
}
