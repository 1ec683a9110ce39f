//! Drift module geometry.

use nalgebra::Point3;
use tracing::warn;

use driftkit_core::{DriftDirection, ModuleId, PlaneId};

use crate::node::BoxDims;
use crate::sorter::GeoObjectSorter;
use crate::transform::LocalTransform;

use super::plane::PlaneGeo;
use super::{bounds_contain, world_bounds};

/// A drift volume housing one or more sense-wire planes.
#[derive(Debug, Clone)]
pub struct ModuleGeo {
    transform: LocalTransform,
    dims: BoxDims,
    active_dims: BoxDims,
    active_center: Point3<f64>,
    planes: Vec<PlaneGeo>,
    id: ModuleId,
    drift_direction: DriftDirection,
    plane0_pitch: Vec<f64>,
    bounds: [f64; 6],
}

impl ModuleGeo {
    /// Build a module from its composed world transform, outer and active
    /// half-extents, the active-volume center, and planes in discovery
    /// order.
    pub fn new(
        transform: LocalTransform,
        dims: BoxDims,
        active_dims: BoxDims,
        active_center: Point3<f64>,
        planes: Vec<PlaneGeo>,
    ) -> Self {
        let bounds = world_bounds(&transform, &dims);
        Self {
            transform,
            dims,
            active_dims,
            active_center,
            planes,
            id: ModuleId::invalid(),
            drift_direction: DriftDirection::UnknownDrift,
            plane0_pitch: Vec::new(),
            bounds,
        }
    }

    /// Reorder the planes (by drift distance) and their wires with the
    /// active sorting strategy, then refresh the plane pitch table.
    pub(crate) fn sort_sub_volumes(&mut self, sorter: &dyn GeoObjectSorter) {
        let center = self.center();
        sorter.sort_planes(&mut self.planes, &center);

        // cumulative distance of each plane from plane 0 along the drift
        // coordinate
        self.plane0_pitch = vec![0.0; self.planes.len()];
        let mut previous_x = self.planes[0].center().x;
        for p in 1..self.planes.len() {
            let x = self.planes[p].center().x;
            self.plane0_pitch[p] = self.plane0_pitch[p - 1] + (x - previous_x).abs();
            previous_x = x;
        }

        for plane in &mut self.planes {
            plane.sort_wires(sorter);
        }
    }

    /// Stamp the post-sort ID, renumber the planes, and derive the drift
    /// direction from the geometry.
    pub(crate) fn update_after_sorting(&mut self, id: ModuleId) {
        self.id = id;

        for (plane_no, plane) in self.planes.iter_mut().enumerate() {
            plane.update_after_sorting(PlaneId::in_module(id, plane_no as u32));
        }

        // The drift direction is derived, not configured: electrons drift
        // from the module body toward the wire planes, so compare the
        // module origin with the first plane origin along x.
        let module_x = self.transform.origin().x;
        let plane_x = self.planes[0].center().x;
        self.drift_direction = if module_x > 1.01 * plane_x {
            DriftDirection::NegX
        } else if module_x < 0.99 * plane_x {
            DriftDirection::PosX
        } else {
            warn!(
                module = %id,
                module_x, plane_x, "unable to derive drift direction"
            );
            DriftDirection::UnknownDrift
        };
    }

    /// The module's ID; invalid until IDs have been assigned.
    pub fn id(&self) -> ModuleId {
        self.id
    }

    /// The world position of the module center.
    pub fn center(&self) -> Point3<f64> {
        self.transform.origin()
    }

    /// The world position of the active volume center.
    pub fn active_center(&self) -> Point3<f64> {
        self.active_center
    }

    /// Derived drift direction of this module.
    pub fn drift_direction(&self) -> DriftDirection {
        self.drift_direction
    }

    /// Outer bounding half-extents.
    pub fn dims(&self) -> &BoxDims {
        &self.dims
    }

    /// Active-volume half-extents.
    pub fn active_dims(&self) -> &BoxDims {
        &self.active_dims
    }

    /// Half width of the active volume (along the drift axis).
    pub fn active_half_width(&self) -> f64 {
        self.active_dims.half_width
    }

    /// Half height of the active volume.
    pub fn active_half_height(&self) -> f64 {
        self.active_dims.half_height
    }

    /// Full length of the active volume.
    pub fn active_length(&self) -> f64 {
        self.active_dims.length()
    }

    /// Number of wire planes.
    pub fn n_planes(&self) -> u32 {
        self.planes.len() as u32
    }

    /// The plane at the given index, if any.
    pub fn plane(&self, plane: u32) -> Option<&PlaneGeo> {
        self.planes.get(plane as usize)
    }

    /// All planes, in sorted order.
    pub fn planes(&self) -> &[PlaneGeo] {
        &self.planes
    }

    /// Largest wire count over this module's planes.
    pub fn max_wires(&self) -> u32 {
        self.planes.iter().map(PlaneGeo::n_wires).max().unwrap_or(0)
    }

    /// Distance of plane `p` from plane 0 along the drift coordinate.
    pub fn plane0_pitch(&self, p: u32) -> f64 {
        self.plane0_pitch[p as usize]
    }

    /// Distance between two planes along the drift coordinate.
    pub fn plane_pitch(&self, p1: u32, p2: u32) -> f64 {
        (self.plane0_pitch[p2 as usize] - self.plane0_pitch[p1 as usize]).abs()
    }

    /// World bounding box, `[x_min, x_max, y_min, y_max, z_min, z_max]`.
    pub fn bounds(&self) -> &[f64; 6] {
        &self.bounds
    }

    /// Whether the world position lies inside the module box, with the
    /// multiplicative wiggle tolerance applied to every face.
    pub fn contains_position(&self, point: &Point3<f64>, wiggle: f64) -> bool {
        bounds_contain(&self.bounds, point, wiggle)
    }
}
