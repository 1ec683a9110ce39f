//! Optical detector geometry.

use nalgebra::Point3;

use driftkit_core::{EnclosureId, INVALID_INDEX};

use crate::node::BoxDims;
use crate::transform::LocalTransform;

/// An optical (light-collection) detector inside an enclosure.
#[derive(Debug, Clone)]
pub struct OpDetGeo {
    transform: LocalTransform,
    dims: BoxDims,
    center: Point3<f64>,
    enclosure: EnclosureId,
    index: u32,
}

impl OpDetGeo {
    /// Build an optical detector from its composed world transform and
    /// half-extents.
    pub fn new(transform: LocalTransform, dims: BoxDims) -> Self {
        let center = transform.origin();
        Self {
            transform,
            dims,
            center,
            enclosure: EnclosureId::invalid(),
            index: INVALID_INDEX,
        }
    }

    /// Stamp the post-sort owning enclosure and index.
    pub(crate) fn update_after_sorting(&mut self, enclosure: EnclosureId, index: u32) {
        self.enclosure = enclosure;
        self.index = index;
    }

    /// The enclosure housing this detector.
    pub fn enclosure_id(&self) -> EnclosureId {
        self.enclosure
    }

    /// Index of this detector within its enclosure.
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
