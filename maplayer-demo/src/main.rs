use std::{
    fs,
    path::{Path, PathBuf},
};

use cgmath::{Point2, Vector2};
use clap::Parser;
use maplayer::{
    GestureRecognizer, GestureSettings, MapLayer, MapLayerListener, MapLayerSettings, MapNode,
    NodeTransform, SettingsError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scenario::{Scenario, FRAME};

mod scenario;

const LAYER_SIZE: (f64, f64) = (4096.0, 4096.0);
const VIEWPORT_SIZE: (f64, f64) = (800.0, 600.0);

#[derive(Error, Debug)]
pub enum DemoError {
    #[error("failed to read settings")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings")]
    Json(#[from] serde_json::Error),
    #[error("invalid settings")]
    Settings(#[from] SettingsError),
}

#[derive(Parser)]
#[command(name = "maplayer-demo")]
#[command(about = "Replays a scripted gesture against a map layer and logs every frame")]
struct Args {
    /// JSON file with `map_layer` and `gestures` settings
    #[arg(short, long)]
    settings: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "fling")]
    scenario: Scenario,

    /// Number of 16ms frames to simulate
    #[arg(short, long, default_value_t = 120)]
    frames: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct DemoSettings {
    map_layer: MapLayerSettings,
    gestures: GestureSettings,
}

impl DemoSettings {
    fn load(path: &Path) -> Result<Self, DemoError> {
        let settings: DemoSettings = serde_json::from_str(&fs::read_to_string(path)?)?;
        settings.map_layer.validate()?;
        settings.gestures.validate()?;
        Ok(settings)
    }
}

struct LogListener;

impl MapLayerListener for LogListener {
    fn scroll(&mut self, recognizer: &GestureRecognizer) {
        log::debug!("scroll {:?} at {:?}", recognizer.state(), recognizer.world_location());
    }

    fn zoom(&mut self, recognizer: &GestureRecognizer) {
        log::debug!("zoom {:?} by {}", recognizer.state(), recognizer.pinch_scale());
    }

    fn tap(&mut self, layer_position: Point2<f64>) {
        log::info!("tap at {layer_position:?}");
    }

    fn long_tap_started(&mut self, layer_position: Point2<f64>) {
        log::info!("long tap started at {layer_position:?}");
    }

    fn long_tap(&mut self, layer_position: Point2<f64>) {
        log::info!("long tap at {layer_position:?}");
    }
}

struct LogNode {
    content_size: Vector2<f64>,
}

impl MapNode for LogNode {
    fn content_size(&self) -> Vector2<f64> {
        self.content_size
    }

    fn set_transform(&mut self, transform: NodeTransform) {
        log::info!(
            "translation ({:.1}, {:.1}) scale {:.3}",
            transform.translation.x,
            transform.translation.y,
            transform.scale
        );
    }
}

fn run(args: Args) -> Result<(), DemoError> {
    let settings = match &args.settings {
        Some(path) => DemoSettings::load(path)?,
        None => DemoSettings::default(),
    };

    let mut node = LogNode {
        content_size: Vector2::from(LAYER_SIZE),
    };
    let mut layer = MapLayer::with_node(&node, Vector2::from(VIEWPORT_SIZE))
        .with_settings(settings.map_layer)
        .with_gesture_settings(settings.gestures)
        .with_listener(LogListener)
        .build();
    layer.scroll_to(Vector2::from(LAYER_SIZE) / 2.0);
    layer.sync_node(&mut node);

    let events = args.scenario.events();
    let mut pending = events.iter().peekable();

    for frame in 0..args.frames {
        let now = FRAME * frame;
        while let Some(event) = pending.next_if(|event| event.timestamp <= now) {
            layer.process_touch(event);
        }

        layer.update(FRAME);
        if layer.sync_node(&mut node) {
            log::debug!("frame {frame}, decelerating: {}", layer.is_decelerating());
        }
    }

    log::info!(
        "finished {:?} after {} frames at offset {:?}, scale {}",
        args.scenario,
        args.frames,
        layer.offset(),
        layer.scale()
    );
    Ok(())
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    if let Err(e) = run(Args::parse()) {
        log::error!("{e}: {:?}", e);
        std::process::exit(1);
    }
}
