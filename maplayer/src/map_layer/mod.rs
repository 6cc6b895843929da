//! A scrollable and zoomable map layer driven by touch gestures.

use std::time::Duration;

use cgmath::{Point2, Vector2};

pub use motion::{MotionState, REFERENCE_FRAME_RATE, VELOCITY_STALE_AFTER};
pub use settings::{MapLayerSettings, ZoomType};

use crate::{
    coords::{CoordinateConverter, NodeTransform},
    gesture::{
        GestureListener, GestureRecognizer, GestureRecognizerLayer, GestureSettings, TouchEvent,
        TouchPhase,
    },
    map_layer::motion::MotionController,
    util::ChangeObserver,
};

mod motion;
mod settings;

/// Transforms which differ by less than this are not pushed to the host node again.
const TRANSFORM_EPSILON: f64 = 1e-3;

/// Receives notifications from a [`MapLayer`].
///
/// Scroll and zoom are reported after the layer applied them. Tap positions are in layer space.
pub trait MapLayerListener {
    fn scroll(&mut self, _recognizer: &GestureRecognizer) {}

    fn zoom(&mut self, _recognizer: &GestureRecognizer) {}

    fn tap(&mut self, _layer_position: Point2<f64>) {}

    fn long_tap_started(&mut self, _layer_position: Point2<f64>) {}

    fn long_tap(&mut self, _layer_position: Point2<f64>) {}
}

impl MapLayerListener for () {}

/// The scene node a map layer moves around.
pub trait MapNode {
    /// Size of the node's content at scale 1.0.
    fn content_size(&self) -> Vector2<f64>;

    fn set_transform(&mut self, transform: NodeTransform);
}

/// Applies gesture callbacks to the motion first, then informs the host.
struct Dispatch<'a> {
    motion: &'a mut MotionController,
    listener: &'a mut (dyn MapLayerListener + 'static),
}

impl GestureListener for Dispatch<'_> {
    fn scroll(&mut self, recognizer: &GestureRecognizer) {
        self.motion.scroll(recognizer);
        self.listener.scroll(recognizer);
    }

    fn zoom(&mut self, recognizer: &GestureRecognizer) {
        self.motion.zoom(recognizer);
        self.listener.zoom(recognizer);
    }

    fn tap(&mut self, position: Point2<f64>) {
        self.listener.tap(self.motion.view_to_layer(position));
    }

    fn long_tap_started(&mut self, position: Point2<f64>) {
        self.listener
            .long_tap_started(self.motion.view_to_layer(position));
    }

    fn long_tap(&mut self, position: Point2<f64>) {
        self.listener.long_tap(self.motion.view_to_layer(position));
    }
}

/// Scrolls and zooms a layer of a fixed size within a viewport.
///
/// The host forwards touches through [`MapLayer::process_touch`], calls [`MapLayer::update`] once
/// per frame and reads the result through [`MapLayer::transform`] or [`MapLayer::sync_node`].
pub struct MapLayer {
    gestures: GestureRecognizerLayer,
    motion: MotionController,
    listener: Box<dyn MapLayerListener>,
    synced: ChangeObserver<NodeTransform>,
}

impl MapLayer {
    /// Starts building a layer which covers `layer_size` at scale 1.0 and is displayed in a
    /// viewport of `viewport_size`.
    pub fn builder(layer_size: Vector2<f64>, viewport_size: Vector2<f64>) -> MapLayerBuilder {
        MapLayerBuilder::new(layer_size, viewport_size)
    }

    /// Starts building a layer which is as large as the content of `node`.
    pub fn with_node(node: &impl MapNode, viewport_size: Vector2<f64>) -> MapLayerBuilder {
        MapLayerBuilder::new(node.content_size(), viewport_size)
    }

    pub fn process_touch(&mut self, event: &TouchEvent) {
        // Stale momentum must not fight the new gesture.
        if event.phase == TouchPhase::Began {
            self.motion.stop_deceleration();
        }

        let mut dispatch = Dispatch {
            motion: &mut self.motion,
            listener: self.listener.as_mut(),
        };
        self.gestures.process_touch(event, &mut dispatch);
    }

    /// Advances long-tap timing and deceleration by `dt`.
    pub fn update(&mut self, dt: Duration) {
        let mut dispatch = Dispatch {
            motion: &mut self.motion,
            listener: self.listener.as_mut(),
        };
        self.gestures.update(dt, &mut dispatch);
        self.motion.update(dt);
    }

    /// Drops all touches, for example when the host removes the layer from the scene.
    pub fn cancel_touches(&mut self) {
        let mut dispatch = Dispatch {
            motion: &mut self.motion,
            listener: self.listener.as_mut(),
        };
        self.gestures.cancel_all(&mut dispatch);
    }

    pub fn transform(&self) -> NodeTransform {
        self.motion.transform()
    }

    /// Pushes the transform to `node` if it changed since the last sync. Returns whether the node
    /// was updated.
    pub fn sync_node(&mut self, node: &mut impl MapNode) -> bool {
        *self.synced = self.motion.transform();
        if !self.synced.did_change(TRANSFORM_EPSILON) {
            return false;
        }
        node.set_transform(*self.synced);
        self.synced.update_reference();
        true
    }

    pub fn motion(&self) -> &MotionState {
        self.motion.state()
    }

    pub fn offset(&self) -> Vector2<f64> {
        self.motion.state().offset
    }

    pub fn scale(&self) -> f64 {
        self.motion.state().scale
    }

    pub fn is_decelerating(&self) -> bool {
        self.motion.state().decelerating
    }

    pub fn stop_deceleration(&mut self) {
        self.motion.stop_deceleration();
    }

    pub fn layer_size(&self) -> Vector2<f64> {
        self.motion.layer_size()
    }

    pub fn viewport_size(&self) -> Vector2<f64> {
        self.motion.viewport_size()
    }

    pub fn resize(&mut self, viewport_size: Vector2<f64>) {
        self.motion.resize(viewport_size);
    }

    pub fn set_layer_size(&mut self, layer_size: Vector2<f64>) {
        self.motion.set_layer_size(layer_size);
    }

    /// Scrolls to `offset`, clamped to the layer bounds.
    pub fn scroll_to(&mut self, offset: Vector2<f64>) {
        self.motion.scroll_to(offset);
    }

    /// Zooms towards the viewport center.
    pub fn set_scale(&mut self, scale: f64) {
        self.motion.set_scale(scale);
    }

    /// Converts a view position into layer coordinates.
    pub fn view_to_layer(&self, view: Point2<f64>) -> Point2<f64> {
        self.motion.view_to_layer(view)
    }

    pub fn settings(&self) -> &MapLayerSettings {
        &self.motion.settings
    }

    pub fn settings_mut(&mut self) -> &mut MapLayerSettings {
        &mut self.motion.settings
    }

    pub fn gesture_settings(&self) -> &GestureSettings {
        self.gestures.settings()
    }

    pub fn gesture_settings_mut(&mut self) -> &mut GestureSettings {
        self.gestures.settings_mut()
    }

    pub fn set_listener(&mut self, listener: impl MapLayerListener + 'static) {
        self.listener = Box::new(listener);
    }

    pub fn set_converter(&mut self, converter: impl CoordinateConverter + 'static) {
        self.gestures.set_converter(converter);
    }

    /// The gesture which is currently being tracked, if any.
    pub fn recognizer(&self) -> Option<&GestureRecognizer> {
        self.gestures.recognizer()
    }
}

/// Stores the layer configuration before the layer is created.
pub struct MapLayerBuilder {
    layer_size: Vector2<f64>,
    viewport_size: Vector2<f64>,
    settings: Option<MapLayerSettings>,
    gesture_settings: Option<GestureSettings>,
    zoom_type: Option<ZoomType>,
    decelerate_enabled: Option<bool>,
    converter: Option<Box<dyn CoordinateConverter>>,
    listener: Option<Box<dyn MapLayerListener>>,
}

impl MapLayerBuilder {
    pub fn new(layer_size: Vector2<f64>, viewport_size: Vector2<f64>) -> Self {
        Self {
            layer_size,
            viewport_size,
            settings: None,
            gesture_settings: None,
            zoom_type: None,
            decelerate_enabled: None,
            converter: None,
            listener: None,
        }
    }

    pub fn with_settings(mut self, settings: MapLayerSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_gesture_settings(mut self, gesture_settings: GestureSettings) -> Self {
        self.gesture_settings = Some(gesture_settings);
        self
    }

    /// Overrides the zoom type of the settings.
    pub fn with_zoom_type(mut self, zoom_type: ZoomType) -> Self {
        self.zoom_type = Some(zoom_type);
        self
    }

    /// Overrides whether scrolling decelerates after release.
    pub fn with_decelerate(mut self, decelerate_enabled: bool) -> Self {
        self.decelerate_enabled = Some(decelerate_enabled);
        self
    }

    pub fn with_converter(mut self, converter: impl CoordinateConverter + 'static) -> Self {
        self.converter = Some(Box::new(converter));
        self
    }

    pub fn with_listener(mut self, listener: impl MapLayerListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn build(self) -> MapLayer {
        let mut settings = self.settings.unwrap_or_default();
        if let Some(zoom_type) = self.zoom_type {
            settings.zoom_type = zoom_type;
        }
        if let Some(decelerate_enabled) = self.decelerate_enabled {
            settings.decelerate_enabled = decelerate_enabled;
        }

        let mut gestures = GestureRecognizerLayer::new(self.gesture_settings.unwrap_or_default());
        if let Some(converter) = self.converter {
            gestures.set_boxed_converter(converter);
        }

        let motion = MotionController::new(settings, self.layer_size, self.viewport_size);
        let synced = ChangeObserver::new(motion.transform());

        MapLayer {
            gestures,
            motion,
            listener: self.listener.unwrap_or_else(|| Box::new(())),
            synced,
        }
    }
}
