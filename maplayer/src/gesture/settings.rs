//! Settings for gesture recognition

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{error::SettingsError, util::duration_secs};

/// Thresholds used to tell taps, long-taps and pans apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    /// Minimum distance from the touch start position needed to start scrolling. Prevents
    /// scrolling on an accidental tap.
    pub scroll_start_threshold: f64,
    /// How long a touch has to rest before a long-tap is announced.
    #[serde(with = "duration_secs")]
    pub long_tap_start_duration: Duration,
    /// How much longer the touch has to rest after the announcement to trigger the long-tap.
    #[serde(with = "duration_secs")]
    pub long_tap_duration: Duration,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            scroll_start_threshold: 10.0,
            long_tap_start_duration: Duration::from_millis(300),
            long_tap_duration: Duration::from_millis(700),
        }
    }
}

impl GestureSettings {
    /// Total time a touch has to rest to trigger a long-tap.
    pub fn long_tap_trigger_duration(&self) -> Duration {
        self.long_tap_start_duration + self.long_tap_duration
    }

    /// Checks the values for sanity. The recognizer itself never calls this, out of range values
    /// lead to unspecified gesture classification.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.scroll_start_threshold.is_finite() || self.scroll_start_threshold < 0.0 {
            return Err(SettingsError::Negative {
                name: "scroll_start_threshold",
                value: self.scroll_start_threshold,
            });
        }
        Ok(())
    }
}
