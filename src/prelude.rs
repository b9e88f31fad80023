//! Prelude module for common types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mercator_viewport::prelude::*;`

pub use crate::core::{
    camera::CameraMatrices,
    config::{ClampReport, ViewportConfig},
    geo::{LatLng, LatLngBounds},
    mercator::{
        clamp_latitude, get_distance_scales, project_flat, scale_to_zoom, unproject_flat,
        zoom_to_scale, DistanceScales,
    },
    viewport::{ProjectOptions, Viewport},
};

pub use crate::traits::{Coordinate, CoordinateTransform};

pub use crate::{Error, Result, ViewportError};
