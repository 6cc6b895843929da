//! # maplayer
//!
//! Touch driven scrolling and zooming for 2D map layers.
//!
//! A [`MapLayer`] receives raw touches from the host, recognizes pans, pinches, taps and
//! long-taps, and turns them into a [`NodeTransform`] for the node which displays the map.
//! Released pans keep gliding and slow down over the following frames.
//!
//! ### Example
//!
//! ```
//! use std::time::Duration;
//!
//! use cgmath::{Point2, Vector2};
//! use maplayer::{MapLayer, TouchEvent, TouchPhase, ZoomType};
//!
//! let mut layer = MapLayer::builder(Vector2::new(4096.0, 4096.0), Vector2::new(800.0, 600.0))
//!     .with_zoom_type(ZoomType::PinchCenterFixed)
//!     .build();
//!
//! layer.process_touch(&TouchEvent::new(1, TouchPhase::Began, Point2::new(400.0, 300.0), Duration::ZERO));
//! layer.process_touch(&TouchEvent::new(1, TouchPhase::Moved, Point2::new(380.0, 300.0), Duration::from_millis(16)));
//! layer.update(Duration::from_millis(16));
//!
//! assert_eq!(layer.offset().x, 20.0);
//! ```

pub mod coords;
pub mod error;
pub mod gesture;
pub mod map_layer;
pub mod util;

pub use coords::{CoordinateConverter, FlipY, IdentityConverter, NodeTransform};
pub use error::SettingsError;
pub use gesture::{
    Gesture, GestureListener, GestureRecognizer, GestureRecognizerLayer, GestureSettings,
    GestureState, TouchEvent, TouchId, TouchPhase, TouchPoint,
};
pub use map_layer::{
    MapLayer, MapLayerBuilder, MapLayerListener, MapLayerSettings, MapNode, MotionState, ZoomType,
};
