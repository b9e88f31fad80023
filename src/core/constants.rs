//! Engine-wide constants for the Web Mercator camera.
//! Keeping them in a single place makes it easier to tweak the magic numbers
//! shared by the projection and the camera.

/// Default square tile size in pixels. World width at zoom 0.
pub const TILE_SIZE: f64 = 512.0;

/// Default camera altitude, in screen heights above the map plane.
pub const DEFAULT_ALTITUDE: f64 = 1.5;

/// Steepest allowed tilt, in degrees from nadir.
pub const MAX_PITCH: f64 = 60.0;

/// Mercator projectable latitude limit, in degrees.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Equatorial circumference of the WGS84 ellipsoid, in meters.
pub const EARTH_CIRCUMFERENCE: f64 = 40_075_016.685_578_5;

/// Near clipping plane, in altitude units.
pub const NEAR_Z: f64 = 0.1;

/// Far clipping plane as a multiple of the farthest visible map distance.
pub const FAR_Z_MULTIPLIER: f64 = 10.0;

/// Dimension substituted for a zero width or height when building matrices.
pub const MIN_DIMENSION: f64 = 1.0;
