use cgmath::{num_traits::clamp, Vector2};

/// Range of scroll offsets which keep the viewport inside the content along one axis.
///
/// Content which is not larger than the viewport can not be scrolled. It is centered instead,
/// which yields a negative offset.
pub fn offset_range(content: f64, viewport: f64) -> (f64, f64) {
    let overflow = content - viewport;
    if overflow <= 0.0 {
        let centered = overflow / 2.0;
        (centered, centered)
    } else {
        (0.0, overflow)
    }
}

pub fn clamp_offset(
    offset: Vector2<f64>,
    content: Vector2<f64>,
    viewport: Vector2<f64>,
) -> Vector2<f64> {
    let (min_x, max_x) = offset_range(content.x, viewport.x);
    let (min_y, max_y) = offset_range(content.y, viewport.y);
    Vector2::new(clamp(offset.x, min_x, max_x), clamp(offset.y, min_y, max_y))
}

#[cfg(test)]
mod tests {
    use cgmath::Vector2;

    use super::{clamp_offset, offset_range};

    #[test]
    fn test_offset_range() {
        assert_eq!(offset_range(2000.0, 800.0), (0.0, 1200.0));
        assert_eq!(offset_range(800.0, 800.0), (0.0, 0.0));
        assert_eq!(offset_range(600.0, 800.0), (-100.0, -100.0));
    }

    #[test]
    fn test_clamp_offset() {
        let content = Vector2::new(2000.0, 600.0);
        let viewport = Vector2::new(800.0, 800.0);

        assert_eq!(
            clamp_offset(Vector2::new(-50.0, 300.0), content, viewport),
            Vector2::new(0.0, -100.0)
        );
        assert_eq!(
            clamp_offset(Vector2::new(1500.0, 0.0), content, viewport),
            Vector2::new(1200.0, -100.0)
        );
        assert_eq!(
            clamp_offset(Vector2::new(400.0, -100.0), content, viewport),
            Vector2::new(400.0, -100.0)
        );
    }
}
