//! Shared trait abstractions
//!
//! Geographic inputs and pixel outputs come in two arities: `[x, y]` and
//! `[x, y, z]`. [`Coordinate`] lets one viewport method serve both and hand
//! back the same arity it was given. [`CoordinateTransform`] is the
//! object-safe seam for code that only needs to move points between
//! geographic and screen space.

/// A 2- or 3-component coordinate.
pub trait Coordinate: Copy {
    /// Number of meaningful components
    const DIMENSIONS: usize;

    /// Widens to three components, a missing z reads as zero
    fn to_xyz(self) -> [f64; 3];

    /// Narrows back, dropping z when `DIMENSIONS == 2`
    fn from_xyz(xyz: [f64; 3]) -> Self;

    fn has_z() -> bool {
        Self::DIMENSIONS == 3
    }
}

impl Coordinate for [f64; 2] {
    const DIMENSIONS: usize = 2;

    fn to_xyz(self) -> [f64; 3] {
        [self[0], self[1], 0.0]
    }

    fn from_xyz([x, y, _]: [f64; 3]) -> Self {
        [x, y]
    }
}

impl Coordinate for [f64; 3] {
    const DIMENSIONS: usize = 3;

    fn to_xyz(self) -> [f64; 3] {
        self
    }

    fn from_xyz(xyz: [f64; 3]) -> Self {
        xyz
    }
}

/// Moves points between geographic and pixel space.
///
/// Fixed arities keep the trait usable as `&dyn CoordinateTransform`.
pub trait CoordinateTransform {
    /// `[lng, lat]` to world pixels
    fn project_flat(&self, lng_lat: [f64; 2]) -> [f64; 2];

    /// World pixels to `[lng, lat]`
    fn unproject_flat(&self, xy: [f64; 2]) -> [f64; 2];

    /// `[lng, lat, meters]` to `[x, y, depth]` screen pixels
    fn project(&self, lng_lat_alt: [f64; 3]) -> [f64; 3];

    /// `[x, y, depth]` screen pixels back to `[lng, lat, meters]`
    fn unproject(&self, pixel: [f64; 3]) -> [f64; 3];
}
