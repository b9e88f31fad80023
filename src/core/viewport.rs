use crate::core::camera::{CameraMatrices, CameraParams};
use crate::core::config::{ClampReport, ViewportConfig};
use crate::core::constants::MIN_DIMENSION;
use crate::core::geo::{LatLng, LatLngBounds};
use crate::core::mercator::{self, DistanceScales};
use crate::traits::{Coordinate, CoordinateTransform};
use crate::{Result, ViewportError};
use nalgebra::Matrix4;

/// Options shared by [`Viewport::project_with`] and [`Viewport::unproject_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectOptions {
    /// Pixel y grows downward from the top edge; `false` measures from the bottom
    pub top_left: bool,
}

impl Default for ProjectOptions {
    fn default() -> Self {
        Self { top_left: true }
    }
}

/// A perspective camera over the Web Mercator plane.
///
/// Built once from a [`ViewportConfig`] and immutable afterwards; changing
/// the map state means building a new viewport. All matrices and distance
/// scales are computed up front, so every query is a few fixed-size
/// multiplications and the value can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct Viewport {
    config: ViewportConfig,
    clamp_report: ClampReport,
    /// World width in pixels, `tile_size * 2^zoom`
    world_size: f64,
    center_world: [f64; 2],
    distance_scales: DistanceScales,
    matrices: CameraMatrices,
}

impl Viewport {
    /// Creates a new viewport. Never fails: out-of-range latitude and pitch
    /// are clamped and a zero width or height is built as one pixel.
    pub fn new(config: ViewportConfig) -> Self {
        let (config, clamp_report) = config.sanitize();
        if clamp_report.any() {
            log::debug!("viewport config sanitized ({clamp_report:?}): {config:?}");
        }

        let world_size = config.tile_size * mercator::zoom_to_scale(config.zoom);
        let center_world = mercator::project_flat([config.longitude, config.latitude], world_size);
        let distance_scales = DistanceScales::new(config.latitude, world_size);

        let matrices = CameraMatrices::new(&CameraParams {
            width: non_zero(config.width),
            height: non_zero(config.height),
            center: center_world,
            bearing: config.bearing,
            pitch: config.pitch,
            altitude: config.altitude,
        });
        log::trace!("pixel projection matrix: {:?}", matrices.pixel_projection);

        Self {
            config,
            clamp_report,
            world_size,
            center_world,
            distance_scales,
            matrices,
        }
    }

    /// The sanitized config this viewport was built from
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// What construction had to clamp or substitute
    pub fn clamp_report(&self) -> ClampReport {
        self.clamp_report
    }

    pub fn width(&self) -> f64 {
        self.config.width
    }

    pub fn height(&self) -> f64 {
        self.config.height
    }

    pub fn longitude(&self) -> f64 {
        self.config.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.config.latitude
    }

    pub fn zoom(&self) -> f64 {
        self.config.zoom
    }

    pub fn bearing(&self) -> f64 {
        self.config.bearing
    }

    pub fn pitch(&self) -> f64 {
        self.config.pitch
    }

    pub fn altitude(&self) -> f64 {
        self.config.altitude
    }

    /// Map center in geographical coordinates
    pub fn center(&self) -> LatLng {
        LatLng::new(self.config.latitude, self.config.longitude)
    }

    /// Map center in world pixels
    pub fn center_world(&self) -> [f64; 2] {
        self.center_world
    }

    /// Gets the scale factor for the current zoom level
    pub fn scale(&self) -> f64 {
        mercator::zoom_to_scale(self.config.zoom)
    }

    /// World width in pixels at the current zoom level
    pub fn world_size(&self) -> f64 {
        self.world_size
    }

    pub fn get_distance_scales(&self) -> &DistanceScales {
        &self.distance_scales
    }

    pub fn matrices(&self) -> &CameraMatrices {
        &self.matrices
    }

    pub fn view_matrix(&self) -> &Matrix4<f64> {
        &self.matrices.view
    }

    pub fn projection_matrix(&self) -> &Matrix4<f64> {
        &self.matrices.projection
    }

    pub fn view_projection_matrix(&self) -> &Matrix4<f64> {
        &self.matrices.view_projection
    }

    pub fn pixel_projection_matrix(&self) -> &Matrix4<f64> {
        &self.matrices.pixel_projection
    }

    pub fn pixel_unprojection_matrix(&self) -> &Matrix4<f64> {
        &self.matrices.pixel_unprojection
    }

    /// `[lng, lat]` to world pixels, no camera involved
    pub fn project_flat(&self, lng_lat: [f64; 2]) -> [f64; 2] {
        mercator::project_flat(lng_lat, self.world_size)
    }

    /// World pixels to `[lng, lat]`, no camera involved
    pub fn unproject_flat(&self, xy: [f64; 2]) -> [f64; 2] {
        mercator::unproject_flat(xy, self.world_size)
    }

    /// `[lng, lat]` or `[lng, lat, meters]` to screen pixels of the same arity.
    /// The third output component is the depth.
    pub fn project<C: Coordinate>(&self, coordinate: C) -> C {
        self.project_with(coordinate, ProjectOptions::default())
    }

    pub fn project_with<C: Coordinate>(&self, coordinate: C, options: ProjectOptions) -> C {
        let [lng, lat, altitude] = coordinate.to_xyz();
        let [x, y] = self.project_flat([lng, lat]);
        let z = altitude * self.distance_scales.pixels_per_meter[2];

        let [px, py, pz] = self.matrices.project_point([x, y, z]);
        C::from_xyz([px, self.flip_y(py, options), pz])
    }

    /// Inverse of [`Viewport::project`].
    ///
    /// A 3-component pixel carries its depth and inverts exactly. A
    /// 2-component pixel has none, so it resolves to where its view ray
    /// meets the map plane.
    pub fn unproject<C: Coordinate>(&self, pixel: C) -> C {
        self.unproject_with(pixel, ProjectOptions::default())
    }

    pub fn unproject_with<C: Coordinate>(&self, pixel: C, options: ProjectOptions) -> C {
        let [px, py, pz] = pixel.to_xyz();
        let py = self.flip_y(py, options);

        let [x, y, z] = if C::has_z() {
            self.matrices.unproject_point([px, py, pz])
        } else {
            self.matrices.unproject_to_ground([px, py])
        };

        let [lng, lat] = self.unproject_flat([x, y]);
        C::from_xyz([lng, lat, z / self.distance_scales.pixels_per_meter[2]])
    }

    fn flip_y(&self, y: f64, options: ProjectOptions) -> f64 {
        if options.top_left {
            y
        } else {
            non_zero(self.config.height) - y
        }
    }

    /// Local meters (east, north, up) to degrees (lng, lat) at the center
    /// latitude. Altitude passes through unchanged.
    pub fn meters_to_lng_lat_delta<C: Coordinate>(&self, meters: C) -> C {
        let [x, y, z] = meters.to_xyz();
        let DistanceScales {
            pixels_per_meter,
            degrees_per_pixel,
            ..
        } = self.distance_scales;

        C::from_xyz([
            x * pixels_per_meter[0] * degrees_per_pixel[0],
            y * pixels_per_meter[1] * degrees_per_pixel[1],
            z,
        ])
    }

    /// Inverse of [`Viewport::meters_to_lng_lat_delta`].
    pub fn lng_lat_delta_to_meters<C: Coordinate>(&self, degrees: C) -> C {
        let [d_lng, d_lat, z] = degrees.to_xyz();
        let DistanceScales {
            pixels_per_degree,
            meters_per_pixel,
            ..
        } = self.distance_scales;

        C::from_xyz([
            d_lng * pixels_per_degree[0] * meters_per_pixel[0],
            d_lat * pixels_per_degree[1] * meters_per_pixel[1],
            z,
        ])
    }

    /// The map center that would put `lng_lat` under `pixel`, keeping zoom,
    /// bearing, pitch and size.
    pub fn get_location_at_point(&self, lng_lat: [f64; 2], pixel: [f64; 2]) -> [f64; 2] {
        let from = self.project_flat(self.unproject(pixel));
        let to = self.project_flat(lng_lat);
        let [cx, cy] = self.center_world;

        self.unproject_flat([cx + to[0] - from[0], cy + to[1] - from[1]])
    }

    /// A flat viewport of the same size that fits `bounds` inside a
    /// `padding`-pixel margin, as zoomed in as possible.
    pub fn fit_bounds(&self, bounds: &LatLngBounds, padding: f64) -> Result<Viewport> {
        if bounds.is_empty() {
            return Err(ViewportError::EmptyBounds);
        }

        if !padding.is_finite() {
            return Err(ViewportError::InvalidConfig(format!(
                "padding must be finite, got {padding}"
            )));
        }

        let available = [
            self.config.width - 2.0 * padding,
            self.config.height - 2.0 * padding,
        ];
        if available[0] <= 0.0 || available[1] <= 0.0 {
            return Err(ViewportError::InvalidConfig(format!(
                "padding {padding} leaves no room in a {}x{} viewport",
                self.config.width, self.config.height
            )));
        }

        // Measure at zoom 0, then scale up until the tighter axis fills
        let tile_size = self.config.tile_size;
        let nw = mercator::project_flat(bounds.north_west().to_lng_lat(), tile_size);
        let se = mercator::project_flat(bounds.south_east().to_lng_lat(), tile_size);
        let fit_scale = (available[0] / (se[0] - nw[0]).abs()).min(available[1] / (se[1] - nw[1]).abs());

        let [longitude, latitude] =
            mercator::unproject_flat([(nw[0] + se[0]) / 2.0, (nw[1] + se[1]) / 2.0], tile_size);

        Ok(Viewport::new(ViewportConfig {
            longitude,
            latitude,
            zoom: mercator::scale_to_zoom(fit_scale),
            bearing: 0.0,
            pitch: 0.0,
            ..self.config
        }))
    }

    /// Whether a pixel, grown by `radius`, overlaps the screen rectangle
    pub fn contains_pixel(&self, [x, y]: [f64; 2], radius: f64) -> bool {
        x + radius >= 0.0
            && x - radius <= self.config.width
            && y + radius >= 0.0
            && y - radius <= self.config.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

/// Viewports are equal when built from the same sanitized config; the
/// matrices are derived from it.
impl PartialEq for Viewport {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
    }
}

impl CoordinateTransform for Viewport {
    fn project_flat(&self, lng_lat: [f64; 2]) -> [f64; 2] {
        mercator::project_flat(lng_lat, self.world_size)
    }

    fn unproject_flat(&self, xy: [f64; 2]) -> [f64; 2] {
        mercator::unproject_flat(xy, self.world_size)
    }

    fn project(&self, lng_lat_alt: [f64; 3]) -> [f64; 3] {
        self.project_with(lng_lat_alt, ProjectOptions::default())
    }

    fn unproject(&self, pixel: [f64; 3]) -> [f64; 3] {
        self.unproject_with(pixel, ProjectOptions::default())
    }
}

impl From<ViewportConfig> for Viewport {
    fn from(config: ViewportConfig) -> Self {
        Self::new(config)
    }
}

fn non_zero(dimension: f64) -> f64 {
    if dimension > 0.0 {
        dimension
    } else {
        MIN_DIMENSION
    }
}
