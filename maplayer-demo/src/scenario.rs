//! Scripted touch sequences.

use std::time::Duration;

use cgmath::Point2;
use clap::ValueEnum;
use maplayer::{TouchEvent, TouchPhase};

pub const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Drag to the left and rest before lifting the finger
    Pan,
    /// Drag to the left and lift the finger while moving
    Fling,
    /// Spread two fingers apart
    Pinch,
    Tap,
    /// Hold a finger for over a second
    LongTap,
}

fn at(frame: u32) -> Duration {
    FRAME * frame
}

fn touch(id: u64, phase: TouchPhase, x: f64, y: f64, frame: u32) -> TouchEvent {
    TouchEvent::new(id, phase, Point2::new(x, y), at(frame))
}

fn drag(rest_frames: u32) -> Vec<TouchEvent> {
    let mut events = vec![touch(1, TouchPhase::Began, 400.0, 300.0, 0)];
    let mut x = 400.0;
    for frame in 1..=10 {
        x -= 12.0;
        events.push(touch(1, TouchPhase::Moved, x, 300.0 - frame as f64, frame));
    }
    events.push(touch(1, TouchPhase::Ended, x, 290.0, 10 + rest_frames));
    events
}

impl Scenario {
    /// Events ordered by timestamp.
    pub fn events(self) -> Vec<TouchEvent> {
        match self {
            Scenario::Pan => drag(10),
            Scenario::Fling => drag(0),
            Scenario::Pinch => {
                let mut events = vec![
                    touch(1, TouchPhase::Began, 300.0, 300.0, 0),
                    touch(2, TouchPhase::Began, 500.0, 300.0, 1),
                ];
                for frame in 2..=11 {
                    let spread = 20.0 * (frame - 1) as f64;
                    events.push(touch(1, TouchPhase::Moved, 300.0 - spread, 300.0, frame));
                    events.push(touch(2, TouchPhase::Moved, 500.0 + spread, 300.0, frame));
                }
                events.push(touch(2, TouchPhase::Ended, 700.0, 300.0, 12));
                events.push(touch(1, TouchPhase::Ended, 100.0, 300.0, 12));
                events
            }
            Scenario::Tap => vec![
                touch(1, TouchPhase::Began, 120.0, 80.0, 0),
                touch(1, TouchPhase::Ended, 121.0, 80.0, 4),
            ],
            Scenario::LongTap => vec![
                touch(1, TouchPhase::Began, 120.0, 80.0, 0),
                touch(1, TouchPhase::Ended, 120.0, 80.0, 75),
            ],
        }
    }
}
