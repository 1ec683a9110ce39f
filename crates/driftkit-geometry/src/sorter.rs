//! Canonical ordering of sibling elements.
//!
//! Exactly one sorter is active per geometry load, chosen externally and
//! passed in as a trait object so experiments can plug in their own
//! conventions. Every implementation must yield a total, reproducible
//! order; all sorts here are stable, so elements with equal keys keep
//! their discovery order rather than landing arbitrarily.

use nalgebra::Point3;

use crate::elements::{AuxDetGeo, EnclosureGeo, ModuleGeo, OpDetGeo, PlaneGeo, WireGeo};

/// Sibling-ordering strategy applied at every nesting level.
pub trait GeoObjectSorter: Send + Sync {
    /// Order the enclosures of the detector.
    fn sort_enclosures(&self, enclosures: &mut [EnclosureGeo]);

    /// Order the modules of one enclosure.
    fn sort_modules(&self, modules: &mut [ModuleGeo]);

    /// Order the planes of one module; `module_center` lets strategies
    /// derive a drift-axis proxy before drift directions exist.
    fn sort_planes(&self, planes: &mut [PlaneGeo], module_center: &Point3<f64>);

    /// Order the wires of one plane.
    fn sort_wires(&self, wires: &mut [WireGeo]);

    /// Order the optical detectors of one enclosure.
    fn sort_op_dets(&self, op_dets: &mut [OpDetGeo]);

    /// Order the detector-wide auxiliary detector list.
    fn sort_aux_dets(&self, aux_dets: &mut [AuxDetGeo]);
}

/// The default detector convention.
///
/// Enclosures and modules order by increasing world position (x, then y,
/// then z); planes by increasing drift distance from the module center;
/// wires by increasing z then y; optical detectors by decreasing z, then
/// y, then x; auxiliary detectors by name, then position.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardSorter;

fn by_position(a: &Point3<f64>, b: &Point3<f64>) -> std::cmp::Ordering {
    a.x.total_cmp(&b.x)
        .then(a.y.total_cmp(&b.y))
        .then(a.z.total_cmp(&b.z))
}

impl GeoObjectSorter for StandardSorter {
    fn sort_enclosures(&self, enclosures: &mut [EnclosureGeo]) {
        enclosures.sort_by(|a, b| by_position(&a.center(), &b.center()));
    }

    fn sort_modules(&self, modules: &mut [ModuleGeo]) {
        modules.sort_by(|a, b| by_position(&a.center(), &b.center()));
    }

    fn sort_planes(&self, planes: &mut [PlaneGeo], module_center: &Point3<f64>) {
        if planes.len() < 2 {
            return;
        }
        // drift-axis proxy: from the module center toward the first
        // discovered plane; sort by distance along it
        let axis = (planes[0].center() - module_center).normalize();
        planes.sort_by(|a, b| {
            let da = (a.center() - module_center).dot(&axis);
            let db = (b.center() - module_center).dot(&axis);
            da.total_cmp(&db)
        });
    }

    fn sort_wires(&self, wires: &mut [WireGeo]) {
        wires.sort_by(|a, b| {
            let (ca, cb) = (a.center(), b.center());
            ca.z.total_cmp(&cb.z).then(ca.y.total_cmp(&cb.y))
        });
    }

    fn sort_op_dets(&self, op_dets: &mut [OpDetGeo]) {
        op_dets.sort_by(|a, b| {
            let (ca, cb) = (a.center(), b.center());
            cb.z.total_cmp(&ca.z)
                .then(cb.y.total_cmp(&ca.y))
                .then(cb.x.total_cmp(&ca.x))
        });
    }

    fn sort_aux_dets(&self, aux_dets: &mut [AuxDetGeo]) {
        aux_dets.sort_by(|a, b| {
            a.name()
                .cmp(b.name())
                .then_with(|| by_position(&a.center(), &b.center()))
        });
    }
}
