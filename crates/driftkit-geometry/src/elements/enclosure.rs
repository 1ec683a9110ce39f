//! Enclosure geometry.

use nalgebra::Point3;

use driftkit_core::{EnclosureId, ModuleId};

use crate::node::BoxDims;
use crate::sorter::GeoObjectSorter;
use crate::transform::LocalTransform;

use super::module::ModuleGeo;
use super::opdet::OpDetGeo;
use super::{bounds_contain, world_bounds};

/// The outermost detector sub-volume, housing drift modules and optical
/// detectors.
#[derive(Debug, Clone)]
pub struct EnclosureGeo {
    transform: LocalTransform,
    dims: BoxDims,
    modules: Vec<ModuleGeo>,
    op_dets: Vec<OpDetGeo>,
    id: EnclosureId,
    bounds: [f64; 6],
}

impl EnclosureGeo {
    /// Build an enclosure from its composed world transform, half-extents,
    /// and children in discovery order.
    pub fn new(
        transform: LocalTransform,
        dims: BoxDims,
        modules: Vec<ModuleGeo>,
        op_dets: Vec<OpDetGeo>,
    ) -> Self {
        let bounds = world_bounds(&transform, &dims);
        Self {
            transform,
            dims,
            modules,
            op_dets,
            id: EnclosureId::invalid(),
            bounds,
        }
    }

    /// Reorder modules, optical detectors, and everything below them with
    /// the active sorting strategy.
    pub(crate) fn sort_sub_volumes(&mut self, sorter: &dyn GeoObjectSorter) {
        sorter.sort_modules(&mut self.modules);
        sorter.sort_op_dets(&mut self.op_dets);
        for module in &mut self.modules {
            module.sort_sub_volumes(sorter);
        }
    }

    /// Stamp the post-sort ID and renumber every child.
    pub(crate) fn update_after_sorting(&mut self, id: EnclosureId) {
        self.id = id;
        for (module_no, module) in self.modules.iter_mut().enumerate() {
            module.update_after_sorting(ModuleId::in_enclosure(id, module_no as u32));
        }
        for (op_det_no, op_det) in self.op_dets.iter_mut().enumerate() {
            op_det.update_after_sorting(id, op_det_no as u32);
        }
    }

    /// The enclosure's ID; invalid until IDs have been assigned.
    pub fn id(&self) -> EnclosureId {
        self.id
    }

    /// The world position of the enclosure center.
    pub fn center(&self) -> Point3<f64> {
        self.transform.origin()
    }

    /// Bounding half-extents.
    pub fn dims(&self) -> &BoxDims {
        &self.dims
    }

    /// Half width (along x).
    pub fn half_width(&self) -> f64 {
        self.dims.half_width
    }

    /// Half height (along y).
    pub fn half_height(&self) -> f64 {
        self.dims.half_height
    }

    /// Full length (along z).
    pub fn length(&self) -> f64 {
        self.dims.length()
    }

    /// Number of drift modules.
    pub fn n_modules(&self) -> u32 {
        self.modules.len() as u32
    }

    /// The module at the given index, if any.
    pub fn module(&self, module: u32) -> Option<&ModuleGeo> {
        self.modules.get(module as usize)
    }

    /// All modules, in sorted order.
    pub fn modules(&self) -> &[ModuleGeo] {
        &self.modules
    }

    /// Number of optical detectors.
    pub fn n_op_dets(&self) -> u32 {
        self.op_dets.len() as u32
    }

    /// The optical detector at the given index, if any.
    pub fn op_det(&self, op_det: u32) -> Option<&OpDetGeo> {
        self.op_dets.get(op_det as usize)
    }

    /// All optical detectors, in sorted order.
    pub fn op_dets(&self) -> &[OpDetGeo] {
        &self.op_dets
    }

    /// World bounding box, `[x_min, x_max, y_min, y_max, z_min, z_max]`.
    pub fn bounds(&self) -> &[f64; 6] {
        &self.bounds
    }

    /// Whether the world position lies inside the enclosure box, with the
    /// multiplicative wiggle tolerance applied to every face.
    pub fn contains_position(&self, point: &Point3<f64>, wiggle: f64) -> bool {
        bounds_contain(&self.bounds, point, wiggle)
    }

    /// Index of the module containing the world position, if any.
    ///
    /// Modules are scanned in ID order, so overlapping tolerance bands
    /// resolve to the lower index deterministically.
    pub fn find_module_at_position(&self, point: &Point3<f64>, wiggle: f64) -> Option<u32> {
        self.modules
            .iter()
            .position(|module| module.contains_position(point, wiggle))
            .map(|m| m as u32)
    }

    /// Index of the optical detector closest to the world position.
    pub fn closest_op_det(&self, point: &Point3<f64>) -> Option<u32> {
        let mut best: Option<(u32, f64)> = None;
        for (o, op_det) in self.op_dets.iter().enumerate() {
            let distance = op_det.distance_to(point);
            match best {
                Some((_, closest)) if closest <= distance => {}
                _ => best = Some((o as u32, distance)),
            }
        }
        best.map(|(o, _)| o)
    }
}
