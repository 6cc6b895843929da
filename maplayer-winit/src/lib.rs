//! Feeds [`winit`] window events into a [`maplayer::MapLayer`].

pub use input::{InputController, UpdateState};

pub mod input;
