use std::{collections::HashMap, time::Duration};

use cgmath::Point2;
use maplayer::{TouchEvent, TouchPhase};

pub fn phase_from_winit(phase: winit::event::TouchPhase) -> TouchPhase {
    match phase {
        winit::event::TouchPhase::Started => TouchPhase::Began,
        winit::event::TouchPhase::Moved => TouchPhase::Moved,
        winit::event::TouchPhase::Ended => TouchPhase::Ended,
        winit::event::TouchPhase::Cancelled => TouchPhase::Cancelled,
    }
}

/// Offset added to winit finger ids. Id 0 belongs to the mouse.
pub const TOUCH_ID_BASE: u64 = 1;

#[derive(Default)]
pub struct TouchHandler {
    last_locations: HashMap<u64, Point2<f64>>,
}

impl TouchHandler {
    pub fn process_touch(
        &mut self,
        id: u64,
        phase: winit::event::TouchPhase,
        location: Point2<f64>,
        timestamp: Duration,
    ) -> Option<TouchEvent> {
        let phase = phase_from_winit(phase);

        // Some platforms report moves which did not move.
        if phase == TouchPhase::Moved && self.last_locations.get(&id) == Some(&location) {
            log::trace!("dropping unmoved touch {id}");
            return None;
        }
        if phase.is_finished() {
            self.last_locations.remove(&id);
        } else {
            self.last_locations.insert(id, location);
        }

        Some(TouchEvent::new(
            id.wrapping_add(TOUCH_ID_BASE),
            phase,
            location,
            timestamp,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cgmath::Point2;
    use maplayer::TouchPhase;

    use super::{phase_from_winit, TouchHandler, TOUCH_ID_BASE};

    #[test]
    fn test_phase_mapping() {
        assert_eq!(
            phase_from_winit(winit::event::TouchPhase::Started),
            TouchPhase::Began
        );
        assert_eq!(
            phase_from_winit(winit::event::TouchPhase::Cancelled),
            TouchPhase::Cancelled
        );
    }

    #[test]
    fn test_repeated_position_is_dropped() {
        let mut handler = TouchHandler::default();
        let location = Point2::new(10.0, 20.0);

        let began = handler
            .process_touch(
                3,
                winit::event::TouchPhase::Started,
                location,
                Duration::ZERO,
            )
            .unwrap();
        assert_eq!(began.id.0, 3 + TOUCH_ID_BASE);

        assert!(handler
            .process_touch(
                3,
                winit::event::TouchPhase::Moved,
                location,
                Duration::from_millis(16)
            )
            .is_none());
        assert!(handler
            .process_touch(
                3,
                winit::event::TouchPhase::Ended,
                location,
                Duration::from_millis(32)
            )
            .is_some());
    }
}
