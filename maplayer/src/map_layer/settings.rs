//! Settings for the map layer

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Decides which point stays put on the screen while zooming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZoomType {
    /// The point in the center of the viewport stays fixed. Zooming goes towards the center.
    #[default]
    ViewCenterFixed,
    /// The point in the center of the pinch stays fixed. Zooming goes towards the fingers.
    PinchCenterFixed,
}

/// Tuning knobs of the map layer. All of them may be changed while the layer is running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapLayerSettings {
    pub zoom_type: ZoomType,
    /// Whether the map keeps scrolling after a pan is released.
    pub decelerate_enabled: bool,
    /// When false, gestures are still recognized but never move or scale the map.
    pub zoom_and_scroll_allowed: bool,

    /// Scroll speed is multiplied by this value. Values above 1.0 scroll faster than the finger.
    pub scroll_speed_multiplicator: f64,
    /// Fraction of the scroll velocity kept per 1/60 s. Within `[0, 1]`, higher values glide
    /// longer.
    pub decelerate_multiplicator: f64,
    /// The velocity at the start of a deceleration is capped to this value, in units per second.
    pub decelerate_scroll_speed_cap: f64,
    /// Deceleration stops once the velocity drops below this value, in units per second.
    pub decelerate_stop_threshold: f64,

    /// Zoom speed is multiplied by this value. Values above 1.0 zoom faster than the fingers.
    pub zoom_speed_multiplicator: f64,
    /// Smallest scale the layer can be zoomed out to.
    pub zoom_min_scale: f64,
    /// Largest scale the layer can be zoomed in to.
    pub zoom_max_scale: f64,
}

impl Default for MapLayerSettings {
    fn default() -> Self {
        Self {
            zoom_type: ZoomType::default(),
            decelerate_enabled: true,
            zoom_and_scroll_allowed: true,
            scroll_speed_multiplicator: 1.0,
            decelerate_multiplicator: 0.95,
            decelerate_scroll_speed_cap: 3000.0,
            decelerate_stop_threshold: 5.0,
            zoom_speed_multiplicator: 1.0,
            zoom_min_scale: 0.5,
            zoom_max_scale: 3.0,
        }
    }
}

impl MapLayerSettings {
    /// Checks the values for sanity.
    ///
    /// The layer never calls this itself. Running it with settings that fail validation is a
    /// contract violation with unspecified, but memory safe, results.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (name, value) in [
            ("scroll_speed_multiplicator", self.scroll_speed_multiplicator),
            ("decelerate_scroll_speed_cap", self.decelerate_scroll_speed_cap),
            ("decelerate_stop_threshold", self.decelerate_stop_threshold),
            ("zoom_speed_multiplicator", self.zoom_speed_multiplicator),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::Negative { name, value });
            }
        }

        for (name, value) in [
            ("zoom_min_scale", self.zoom_min_scale),
            ("zoom_max_scale", self.zoom_max_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::NotPositive { name, value });
            }
        }

        if !(0.0..=1.0).contains(&self.decelerate_multiplicator) {
            return Err(SettingsError::DecelerateMultiplicator(
                self.decelerate_multiplicator,
            ));
        }

        if self.zoom_min_scale > self.zoom_max_scale {
            return Err(SettingsError::ZoomRange {
                min: self.zoom_min_scale,
                max: self.zoom_max_scale,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MapLayerSettings, ZoomType};
    use crate::error::SettingsError;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(MapLayerSettings::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_inverted_zoom_range() {
        let settings = MapLayerSettings {
            zoom_min_scale: 4.0,
            zoom_max_scale: 2.0,
            ..MapLayerSettings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::ZoomRange { min: 4.0, max: 2.0 })
        );
    }

    #[test]
    fn rejects_growing_deceleration() {
        let settings = MapLayerSettings {
            decelerate_multiplicator: 1.2,
            ..MapLayerSettings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::DecelerateMultiplicator(1.2))
        );
    }

    #[test]
    fn reads_json() {
        let settings: MapLayerSettings = serde_json::from_str(
            r#"{ "zoom_type": "PinchCenterFixed", "zoom_max_scale": 8.0, "decelerate_enabled": false }"#,
        )
        .unwrap();
        assert_eq!(settings.zoom_type, ZoomType::PinchCenterFixed);
        assert_eq!(settings.zoom_max_scale, 8.0);
        assert!(!settings.decelerate_enabled);
        assert_eq!(settings.zoom_min_scale, 0.5);
    }
}
