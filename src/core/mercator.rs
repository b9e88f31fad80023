//! Web Mercator plane mapping and local distance scales
//!
//! World coordinates are pixels at a given `scale` (world width, i.e.
//! `tile_size * 2^zoom`), with the origin at the north-west corner of the
//! world and y growing southward. Every function here is pure.

use crate::core::constants::{EARTH_CIRCUMFERENCE, MAX_LATITUDE, TILE_SIZE};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_4, PI, TAU};

/// Clamps a latitude into the range where the Mercator `y` stays finite.
pub fn clamp_latitude(latitude: f64) -> f64 {
    latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE)
}

/// Zoom level to linear scale factor (`2^zoom`).
pub fn zoom_to_scale(zoom: f64) -> f64 {
    zoom.exp2()
}

/// Linear scale factor back to a zoom level.
pub fn scale_to_zoom(scale: f64) -> f64 {
    scale.log2()
}

/// Projects `[longitude, latitude]` in degrees onto the Mercator plane of
/// width `scale` pixels.
pub fn project_flat([lng, lat]: [f64; 2], scale: f64) -> [f64; 2] {
    let lambda = lng.to_radians();
    let phi = clamp_latitude(lat).to_radians();
    let x = scale * (lambda + PI) / TAU;
    let y = scale * (PI - (FRAC_PI_4 + phi * 0.5).tan().ln()) / TAU;
    [x, y]
}

/// Inverse of [`project_flat`].
pub fn unproject_flat([x, y]: [f64; 2], scale: f64) -> [f64; 2] {
    let lambda = x / scale * TAU - PI;
    let phi = 2.0 * ((PI - y / scale * TAU).exp().atan() - FRAC_PI_4);
    [lambda.to_degrees(), phi.to_degrees()]
}

/// Local linear conversion factors between pixels, meters and degrees.
///
/// Components are ordered `[x, y, z]`: east, north, up. The y components are
/// negative because world y grows southward while latitude and northing grow
/// northward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceScales {
    pub meters_per_pixel: [f64; 3],
    pub pixels_per_meter: [f64; 3],
    pub degrees_per_pixel: [f64; 3],
    pub pixels_per_degree: [f64; 3],
}

impl DistanceScales {
    /// Scales at `latitude` on a world `world_size` pixels wide.
    pub fn new(latitude: f64, world_size: f64) -> Self {
        let lat_cosine = clamp_latitude(latitude).to_radians().cos();

        // d(x)/d(lng) is constant; d(y)/d(lat) grows with sec(lat)
        let pixels_per_degree_x = world_size / 360.0;
        let pixels_per_degree_y = pixels_per_degree_x / lat_cosine;

        let pixels_per_meter_xy = world_size / EARTH_CIRCUMFERENCE / lat_cosine;
        // Altitude is not projected, so the vertical unit is the equatorial one
        let pixels_per_meter_z = world_size / EARTH_CIRCUMFERENCE;

        let pixels_per_meter = [pixels_per_meter_xy, -pixels_per_meter_xy, pixels_per_meter_z];
        let pixels_per_degree = [pixels_per_degree_x, -pixels_per_degree_y, pixels_per_meter_z];

        Self {
            meters_per_pixel: reciprocal(pixels_per_meter),
            pixels_per_meter,
            degrees_per_pixel: reciprocal(pixels_per_degree),
            pixels_per_degree,
        }
    }
}

fn reciprocal(v: [f64; 3]) -> [f64; 3] {
    v.map(|c| 1.0 / c)
}

/// Distance scales at `latitude` and `zoom` with the default tile size.
pub fn get_distance_scales(latitude: f64, zoom: f64) -> DistanceScales {
    DistanceScales::new(latitude, zoom_to_scale(zoom) * TILE_SIZE)
}
