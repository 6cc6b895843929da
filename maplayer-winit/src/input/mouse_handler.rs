use std::time::Duration;

use cgmath::Point2;
use maplayer::{TouchEvent, TouchPhase};
use winit::event::{ElementState, MouseButton};

/// Touch id of the emulated finger which follows the left mouse button.
pub const MOUSE_TOUCH_ID: u64 = 0;

/// Turns left button drags into single finger touches.
#[derive(Default)]
pub struct MouseHandler {
    window_position: Option<Point2<f64>>,
    is_pressed: bool,
}

impl MouseHandler {
    pub fn process_mouse_key_press(
        &mut self,
        button: &MouseButton,
        state: &ElementState,
        timestamp: Duration,
    ) -> Option<TouchEvent> {
        if *button != MouseButton::Left {
            return None;
        }
        let window_position = self.window_position?;

        match (state, self.is_pressed) {
            (ElementState::Pressed, false) => {
                self.is_pressed = true;
                Some(Self::event(TouchPhase::Began, window_position, timestamp))
            }
            (ElementState::Released, true) => {
                self.is_pressed = false;
                Some(Self::event(TouchPhase::Ended, window_position, timestamp))
            }
            _ => None,
        }
    }

    pub fn process_window_position(
        &mut self,
        window_position: Point2<f64>,
        timestamp: Duration,
    ) -> Option<TouchEvent> {
        let moved = self.window_position != Some(window_position);
        self.window_position = Some(window_position);

        if self.is_pressed && moved {
            Some(Self::event(TouchPhase::Moved, window_position, timestamp))
        } else {
            None
        }
    }

    /// A drag which leaves the window is cancelled, the release would never arrive.
    pub fn process_cursor_left(&mut self, timestamp: Duration) -> Option<TouchEvent> {
        let window_position = self.window_position.take()?;
        if !self.is_pressed {
            return None;
        }
        self.is_pressed = false;
        log::debug!("cursor left the window, cancelling drag at {window_position:?}");
        Some(Self::event(
            TouchPhase::Cancelled,
            window_position,
            timestamp,
        ))
    }

    fn event(phase: TouchPhase, location: Point2<f64>, timestamp: Duration) -> TouchEvent {
        TouchEvent::new(MOUSE_TOUCH_ID, phase, location, timestamp)
    }
}
