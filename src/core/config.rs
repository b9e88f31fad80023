//! Viewport configuration
//!
//! A [`ViewportConfig`] is the immutable map state a [`Viewport`] is built
//! from. Every field has a default, so partial JSON documents deserialize
//! cleanly and callers only spell out what differs.
//!
//! [`Viewport`]: crate::core::viewport::Viewport

use crate::core::constants::{DEFAULT_ALTITUDE, MAX_PITCH, TILE_SIZE};
use crate::core::mercator::clamp_latitude;
use crate::{Result, ViewportError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    /// Width in pixels, zero is allowed
    pub width: f64,
    /// Height in pixels, zero is allowed
    pub height: f64,
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    /// Degrees clockwise from north
    pub bearing: f64,
    /// Degrees from nadir
    pub pitch: f64,
    /// Camera height in screen heights
    pub altitude: f64,
    /// World width at zoom 0, in pixels
    pub tile_size: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            longitude: 0.0,
            latitude: 0.0,
            zoom: 0.0,
            bearing: 0.0,
            pitch: 0.0,
            altitude: DEFAULT_ALTITUDE,
            tile_size: TILE_SIZE,
        }
    }
}

/// What [`ViewportConfig::sanitize`] had to change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClampReport {
    pub latitude_clamped: bool,
    pub pitch_clamped: bool,
    /// Width or height was zero and is replaced by one pixel in the matrices
    pub size_substituted: bool,
    /// Altitude or tile size was unusable and fell back to its default
    pub default_substituted: bool,
}

impl ClampReport {
    pub fn any(&self) -> bool {
        self.latitude_clamped || self.pitch_clamped || self.size_substituted || self.default_substituted
    }
}

impl ViewportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_center(mut self, longitude: f64, latitude: f64) -> Self {
        self.longitude = longitude;
        self.latitude = latitude;
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = bearing;
        self
    }

    pub fn with_pitch(mut self, pitch: f64) -> Self {
        self.pitch = pitch;
        self
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = altitude;
        self
    }

    pub fn with_tile_size(mut self, tile_size: f64) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Parses a (possibly partial) JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Strict check for callers that want to reject rather than clamp.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("width", self.width),
            ("height", self.height),
            ("longitude", self.longitude),
            ("latitude", self.latitude),
            ("zoom", self.zoom),
            ("bearing", self.bearing),
            ("pitch", self.pitch),
            ("altitude", self.altitude),
            ("tileSize", self.tile_size),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ViewportError::InvalidConfig(format!("{name} is not finite: {value}")));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ViewportError::InvalidConfig(format!(
                "negative size {}x{}",
                self.width, self.height
            )));
        }
        if self.altitude <= 0.0 {
            return Err(ViewportError::InvalidConfig(format!(
                "altitude must be positive, got {}",
                self.altitude
            )));
        }
        if self.tile_size <= 0.0 {
            return Err(ViewportError::InvalidConfig(format!(
                "tile size must be positive, got {}",
                self.tile_size
            )));
        }
        Ok(())
    }

    /// Clamps the config into the range the camera model is defined on.
    ///
    /// Width and height are kept as given (negative becomes zero); the
    /// one-pixel substitute for a zero dimension only applies to matrices.
    pub fn sanitize(&self) -> (Self, ClampReport) {
        let mut config = *self;
        let mut report = ClampReport::default();

        let latitude = clamp_latitude(self.latitude);
        if latitude != self.latitude {
            report.latitude_clamped = true;
            config.latitude = latitude;
        }

        let pitch = self.pitch.clamp(0.0, MAX_PITCH);
        if pitch != self.pitch {
            report.pitch_clamped = true;
            config.pitch = pitch;
        }

        config.width = self.width.max(0.0);
        config.height = self.height.max(0.0);
        report.size_substituted = config.width == 0.0 || config.height == 0.0;

        if !(self.altitude.is_finite() && self.altitude > 0.0) {
            report.default_substituted = true;
            config.altitude = DEFAULT_ALTITUDE;
        }
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            report.default_substituted = true;
            config.tile_size = TILE_SIZE;
        }

        (config, report)
    }
}
