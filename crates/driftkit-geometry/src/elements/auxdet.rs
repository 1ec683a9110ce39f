//! Auxiliary detector geometry.

use nalgebra::Point3;

use driftkit_core::INVALID_INDEX;

use crate::node::BoxDims;
use crate::transform::LocalTransform;

/// An auxiliary detector outside the enclosures (scintillator paddle,
/// muon counter, beam trigger).
#[derive(Debug, Clone)]
pub struct AuxDetGeo {
    name: String,
    transform: LocalTransform,
    dims: BoxDims,
    center: Point3<f64>,
    index: u32,
}

impl AuxDetGeo {
    /// Build an auxiliary detector from its volume name, composed world
    /// transform, and half-extents.
    pub fn new(name: impl Into<String>, transform: LocalTransform, dims: BoxDims) -> Self {
        let center = transform.origin();
        Self {
            name: name.into(),
            transform,
            dims,
            center,
            index: INVALID_INDEX,
        }
    }

    /// Stamp the post-sort detector index.
    pub(crate) fn update_after_sorting(&mut self, index: u32) {
        self.index = index;
    }

    /// The volume name this detector was built from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of this detector within the detector-wide list.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The world position of the detector center.
    pub fn center(&self) -> Point3<f64> {
        self.center
    }

    /// Bounding half-extents.
    pub fn dims(&self) -> &BoxDims {
        &self.dims
    }

    /// Distance from the detector center to a world position.
    pub fn distance_to(&self, point: &Point3<f64>) -> f64 {
        (point - self.center).norm()
    }

    /// The composed world transform.
    pub fn transform(&self) -> &LocalTransform {
        &self.transform
    }
}
