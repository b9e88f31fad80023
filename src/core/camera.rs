//! Perspective camera over the Mercator plane
//!
//! Builds the view, projection and pixel matrices for a [`Viewport`]. World
//! coordinates are Mercator pixels; camera space is measured in screen
//! heights so that `altitude` keeps its meaning at every zoom.
//!
//! [`Viewport`]: crate::core::viewport::Viewport

use crate::core::constants::{FAR_Z_MULTIPLIER, NEAR_Z};
use nalgebra::{Matrix4, Rotation3, Vector3, Vector4};
use std::f64::consts::FRAC_PI_2;

/// Smallest sine allowed between the top frustum edge and the horizon.
const MIN_HORIZON_SINE: f64 = 0.01;

/// Inputs of the camera model, already sanitized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    /// Matrix width in pixels, never zero
    pub width: f64,
    /// Matrix height in pixels, never zero
    pub height: f64,
    /// Map center in world pixels
    pub center: [f64; 2],
    pub bearing: f64,
    pub pitch: f64,
    pub altitude: f64,
}

/// Field of view, in radians, of a camera `altitude` screen heights above the map.
pub fn field_of_view(altitude: f64) -> f64 {
    2.0 * (0.5 / altitude).atan()
}

/// World pixels, relative to the map center, to camera space.
///
/// Read right to left: scale pixels to screen heights with north up, rotate
/// by bearing, tilt by pitch, then back the camera off by `altitude`.
pub fn uncentered_view_matrix(params: &CameraParams) -> Matrix4<f64> {
    let unit = 1.0 / params.height;
    let to_screen_heights = Matrix4::new_nonuniform_scaling(&Vector3::new(unit, -unit, unit));
    let bearing = Rotation3::from_axis_angle(&Vector3::z_axis(), params.bearing.to_radians());
    let pitch = Rotation3::from_axis_angle(&Vector3::x_axis(), -params.pitch.to_radians());
    let altitude = Matrix4::new_translation(&Vector3::new(0.0, 0.0, -params.altitude));

    altitude * pitch.to_homogeneous() * bearing.to_homogeneous() * to_screen_heights
}

/// World pixels to camera space: the center moves to the origin first, so
/// bearing and pitch turn the map around its center.
pub fn view_matrix(params: &CameraParams) -> Matrix4<f64> {
    uncentered_view_matrix(params) * center_translation(params.center, -1.0)
}

fn center_translation([x, y]: [f64; 2], sign: f64) -> Matrix4<f64> {
    Matrix4::new_translation(&Vector3::new(sign * x, sign * y, 0.0))
}

/// Camera space to clip space.
///
/// The far plane sits beyond the farthest map point visible at the top edge
/// of the screen, which moves outward as the camera tilts.
pub fn projection_matrix(params: &CameraParams) -> Matrix4<f64> {
    let fov = field_of_view(params.altitude);
    let half_fov = fov / 2.0;
    let pitch = params.pitch.to_radians();

    let horizon_sine = (FRAC_PI_2 - pitch - half_fov).sin().max(MIN_HORIZON_SINE);
    let top_half_surface_distance = half_fov.sin() * params.altitude / horizon_sine;
    let far_z = pitch.sin() * top_half_surface_distance + params.altitude;

    Matrix4::new_perspective(
        params.width / params.height,
        fov,
        NEAR_Z,
        far_z * FAR_Z_MULTIPLIER,
    )
}

/// Clip space to screen pixels, origin at the top-left corner and y down.
pub fn viewport_matrix(width: f64, height: f64) -> Matrix4<f64> {
    Matrix4::new_nonuniform_scaling(&Vector3::new(width / 2.0, -height / 2.0, 1.0))
        * Matrix4::new_translation(&Vector3::new(1.0, -1.0, 0.0))
}

/// Multiplies a homogeneous vector through `matrix`.
pub fn transform_vector(matrix: &Matrix4<f64>, [x, y, z, w]: [f64; 4]) -> [f64; 4] {
    let v = matrix * Vector4::new(x, y, z, w);
    [v.x, v.y, v.z, v.w]
}

/// Transforms a point and performs the perspective division.
pub fn transform_point(matrix: &Matrix4<f64>, [x, y, z]: [f64; 3]) -> [f64; 3] {
    let [vx, vy, vz, vw] = transform_vector(matrix, [x, y, z, 1.0]);
    [vx / vw, vy / vw, vz / vw]
}

/// Column-major copy for GPU upload.
pub fn to_column_arrays(matrix: &Matrix4<f64>) -> [[f32; 4]; 4] {
    let mut columns = [[0.0_f32; 4]; 4];
    for (c, column) in columns.iter_mut().enumerate() {
        for (r, value) in column.iter_mut().enumerate() {
            *value = matrix[(r, c)] as f32;
        }
    }
    columns
}

/// The matrices a viewport caches at construction.
///
/// `pixel_projection` is the full world-to-screen transform handed to
/// renderers. Its center translation reaches tens of millions of pixels at
/// high zoom, which costs digits when inverted, so point queries go through
/// the `local_*` pair instead: the same transform applied to coordinates
/// already taken relative to `center`.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraMatrices {
    pub view: Matrix4<f64>,
    pub projection: Matrix4<f64>,
    pub view_projection: Matrix4<f64>,
    /// World pixels straight to screen pixels
    pub pixel_projection: Matrix4<f64>,
    /// Inverse of `pixel_projection`
    pub pixel_unprojection: Matrix4<f64>,
    /// Map center in world pixels
    pub center: [f64; 2],
    /// Center-relative world pixels to screen pixels
    pub local_projection: Matrix4<f64>,
    /// Inverse of `local_projection`
    pub local_unprojection: Matrix4<f64>,
}

impl CameraMatrices {
    pub fn new(params: &CameraParams) -> Self {
        let projection = projection_matrix(params);
        let to_screen = viewport_matrix(params.width, params.height);

        let local_projection = to_screen * projection * uncentered_view_matrix(params);
        let local_unprojection = local_projection.try_inverse().unwrap_or_else(|| {
            log::warn!("pixel projection matrix is singular for {params:?}");
            Matrix4::identity()
        });

        let view = view_matrix(params);
        let view_projection = projection * view;

        Self {
            view,
            projection,
            view_projection,
            pixel_projection: to_screen * view_projection,
            pixel_unprojection: center_translation(params.center, 1.0) * local_unprojection,
            center: params.center,
            local_projection,
            local_unprojection,
        }
    }

    /// World pixels to screen pixels `[x, y, depth]`
    pub fn project_point(&self, [x, y, z]: [f64; 3]) -> [f64; 3] {
        transform_point(&self.local_projection, [x - self.center[0], y - self.center[1], z])
    }

    /// Screen pixels `[x, y, depth]` back to world pixels
    pub fn unproject_point(&self, pixel: [f64; 3]) -> [f64; 3] {
        let [x, y, z] = transform_point(&self.local_unprojection, pixel);
        [x + self.center[0], y + self.center[1], z]
    }

    /// World point on the map plane under a screen pixel.
    ///
    /// Every depth along the pixel's view ray is a candidate; this picks the
    /// one whose world altitude is zero.
    pub fn unproject_to_ground(&self, [px, py]: [f64; 2]) -> [f64; 3] {
        let origin = transform_vector(&self.local_unprojection, [px, py, 0.0, 1.0]);
        let depth_axis = transform_vector(&self.local_unprojection, [0.0, 0.0, 1.0, 0.0]);

        let depth = if depth_axis[2] != 0.0 {
            -origin[2] / depth_axis[2]
        } else {
            0.0
        };
        let ground: [f64; 4] = std::array::from_fn(|i| origin[i] + depth * depth_axis[i]);
        [
            ground[0] / ground[3] + self.center[0],
            ground[1] / ground[3] + self.center[1],
            0.0,
        ]
    }

    /// Get view-projection matrix as array for GPU upload
    pub fn view_projection_array(&self) -> [[f32; 4]; 4] {
        to_column_arrays(&self.view_projection)
    }

    /// True when no matrix holds a NaN or infinite entry
    pub fn is_finite(&self) -> bool {
        [
            &self.view,
            &self.projection,
            &self.view_projection,
            &self.pixel_projection,
            &self.pixel_unprojection,
            &self.local_projection,
            &self.local_unprojection,
        ]
        .iter()
        .all(|m| m.iter().all(|v| v.is_finite()))
    }
}
