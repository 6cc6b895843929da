//! Provides utilities related to coordinates.
//!
//! Three spaces are involved:
//! * screen space, in which the host reports touches,
//! * view space (also called world or GL space), in which all gesture math happens,
//! * layer space, the unscaled content coordinates of the map.

use cgmath::{Point2, Vector2};

use crate::util::SignificantlyDifferent;

/// Converts touch positions from screen space into view space. Provided by the host.
pub trait CoordinateConverter {
    fn screen_to_view(&self, screen: Point2<f64>) -> Point2<f64>;
}

/// Screen and view space are the same.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

impl CoordinateConverter for IdentityConverter {
    fn screen_to_view(&self, screen: Point2<f64>) -> Point2<f64> {
        screen
    }
}

/// Screen space has its origin at the top left, view space at the bottom left.
#[derive(Debug, Clone, Copy)]
pub struct FlipY {
    pub height: f64,
}

impl CoordinateConverter for FlipY {
    fn screen_to_view(&self, screen: Point2<f64>) -> Point2<f64> {
        Point2::new(screen.x, self.height - screen.y)
    }
}

impl<F> CoordinateConverter for F
where
    F: Fn(Point2<f64>) -> Point2<f64>,
{
    fn screen_to_view(&self, screen: Point2<f64>) -> Point2<f64> {
        self(screen)
    }
}

/// Translation and uniform scale applied to the host node.
///
/// A layer point `p` is displayed at the view point `p * scale + translation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub translation: Vector2<f64>,
    pub scale: f64,
}

impl NodeTransform {
    pub fn layer_to_view(&self, layer: Point2<f64>) -> Point2<f64> {
        Point2::new(
            layer.x * self.scale + self.translation.x,
            layer.y * self.scale + self.translation.y,
        )
    }

    pub fn view_to_layer(&self, view: Point2<f64>) -> Point2<f64> {
        Point2::new(
            (view.x - self.translation.x) / self.scale,
            (view.y - self.translation.y) / self.scale,
        )
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            translation: Vector2::new(0.0, 0.0),
            scale: 1.0,
        }
    }
}

impl SignificantlyDifferent for NodeTransform {
    type Epsilon = f64;

    fn ne(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        (self.translation.x - other.translation.x).abs() > epsilon
            || (self.translation.y - other.translation.y).abs() > epsilon
            || (self.scale - other.scale).abs() > epsilon
    }
}
