//! # mercator-viewport
//!
//! A reversible transform engine between geographic coordinates and screen
//! pixels for map visualization.
//!
//! A [`Viewport`] models a perspective camera over the Web Mercator plane,
//! described by size, center, zoom, bearing and pitch. It projects
//! `[lng, lat]` / `[lng, lat, meters]` to pixels and back, and exposes the
//! local distance scales and camera matrices that renderers consume.
//!
//! ```
//! use mercator_viewport::{Viewport, ViewportConfig};
//!
//! let viewport = Viewport::new(
//!     ViewportConfig::new()
//!         .with_size(800.0, 600.0)
//!         .with_center(-122.43, 37.75)
//!         .with_zoom(11.5),
//! );
//! let pixel = viewport.project([-122.43, 37.75]);
//! assert!((pixel[0] - 400.0).abs() < 1e-6);
//! let lng_lat = viewport.unproject(pixel);
//! assert!((lng_lat[1] - 37.75).abs() < 1e-6);
//! ```

pub mod core;
pub mod prelude;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    camera::CameraMatrices,
    config::{ClampReport, ViewportConfig},
    geo::{LatLng, LatLngBounds},
    mercator::{get_distance_scales, project_flat, unproject_flat, DistanceScales},
    viewport::{ProjectOptions, Viewport},
};

pub use traits::{Coordinate, CoordinateTransform};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, ViewportError>;

/// Errors at the configuration boundary. The projection math itself is
/// total and never returns one.
#[derive(Debug, thiserror::Error)]
pub enum ViewportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Bounds have no extent")]
    EmptyBounds,
}

/// Error type alias for convenience
pub type Error = ViewportError;
