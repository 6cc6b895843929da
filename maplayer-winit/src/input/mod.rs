//! Handles the user input which is dispatched by the main event loop.

use std::time::Duration;

use cgmath::{Point2, Vector2};
use instant::Instant;
use maplayer::{MapLayer, TouchEvent};
use winit::event::WindowEvent;

use crate::input::{mouse_handler::MouseHandler, touch_handler::TouchHandler};

mod mouse_handler;
mod touch_handler;

/// Translates window events into touches for a [`MapLayer`].
///
/// Events are stamped with the time elapsed since the controller was created. Positions are
/// divided by the scale factor of the window, so the layer works in logical pixels.
pub struct InputController {
    epoch: Instant,
    touch_handler: TouchHandler,
    mouse_handler: MouseHandler,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}

impl InputController {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            touch_handler: TouchHandler::default(),
            mouse_handler: MouseHandler::default(),
        }
    }

    fn timestamp(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Process the given winit `[winit::event::WindowEvent]`.
    /// Returns true if the event has been processed and false otherwise.
    pub fn window_input(
        &mut self,
        event: &WindowEvent,
        scale_factor: f64,
        layer: &mut MapLayer,
    ) -> bool {
        let timestamp = self.timestamp();
        match event {
            WindowEvent::Touch(touch) => {
                let position: (f64, f64) = touch.location.into();
                let location = logical(position, scale_factor);
                let event = self
                    .touch_handler
                    .process_touch(touch.id, touch.phase, location, timestamp);
                dispatch(event, layer)
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position: (f64, f64) = (*position).into();
                let location = logical(position, scale_factor);
                let event = self
                    .mouse_handler
                    .process_window_position(location, timestamp);
                dispatch(event, layer)
            }
            WindowEvent::MouseInput { button, state, .. } => {
                let event = self
                    .mouse_handler
                    .process_mouse_key_press(button, state, timestamp);
                dispatch(event, layer)
            }
            WindowEvent::CursorLeft { .. } => {
                let event = self.mouse_handler.process_cursor_left(timestamp);
                dispatch(event, layer)
            }
            WindowEvent::Resized(size) => {
                let size: (f64, f64) = (size.width as f64, size.height as f64);
                layer.resize(Vector2::from(size) / scale_factor);
                true
            }
            _ => false,
        }
    }
}

fn logical(position: (f64, f64), scale_factor: f64) -> Point2<f64> {
    Point2::new(position.0 / scale_factor, position.1 / scale_factor)
}

fn dispatch(event: Option<TouchEvent>, layer: &mut MapLayer) -> bool {
    match event {
        Some(event) => {
            layer.process_touch(&event);
            true
        }
        None => false,
    }
}

pub trait UpdateState {
    fn update_state(&mut self, layer: &mut MapLayer, dt: Duration);
}

impl UpdateState for InputController {
    fn update_state(&mut self, layer: &mut MapLayer, dt: Duration) {
        layer.update(dt);
    }
}
