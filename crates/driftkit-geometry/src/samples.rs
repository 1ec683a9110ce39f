//! Synthetic detector descriptions.
//!
//! Hand-built volume trees standing in for a loader, used by the test
//! suites and the dump demo. Children are intentionally added in scrambled
//! order so that sorting is actually exercised.

use std::f64::consts::FRAC_PI_2;

use crate::node::{BoxDims, VolumeNode};
use crate::transform::LocalTransform;

/// Parameters of the symmetric sample detector.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    /// Number of enclosures, spread along x.
    pub n_enclosures: u32,
    /// Modules per enclosure, spread along x.
    pub n_modules: u32,
    /// Wire planes per module.
    pub n_planes: u32,
    /// Wires per plane.
    pub n_wires: u32,
    /// Wire pitch in cm.
    pub wire_pitch: f64,
    /// Wire angle from vertical per plane, in radians; its length must
    /// equal `n_planes`.
    pub plane_angles: Vec<f64>,
    /// Optical detectors per enclosure.
    pub n_op_dets: u32,
    /// Auxiliary detectors above the detector.
    pub n_aux_dets: u32,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            n_enclosures: 2,
            n_modules: 2,
            n_planes: 3,
            n_wires: 100,
            wire_pitch: 0.4,
            plane_angles: vec![0.0, 30f64.to_radians(), -30f64.to_radians()],
            n_op_dets: 4,
            n_aux_dets: 2,
        }
    }
}

impl SampleConfig {
    /// World x of the center of enclosure `e`.
    pub fn enclosure_x(&self, e: u32) -> f64 {
        200.0 + 400.0 * f64::from(e)
    }

    /// World x of the center of module `m` of enclosure `e`.
    pub fn module_x(&self, e: u32, m: u32) -> f64 {
        self.enclosure_x(e) - 70.0 + 140.0 * f64::from(m)
    }

    /// World x of plane `p` of any module (offset from the module center).
    pub fn plane_x(&self, e: u32, m: u32, p: u32) -> f64 {
        self.module_x(e, m) - 56.0 - 1.5 * f64::from(p)
    }
}

/// A wire volume at the given angle from vertical, offset along the
/// plane's wire-coordinate direction.
fn wire_node(angle_from_vertical: f64, offset: f64, half_length: f64, w: u32) -> VolumeNode {
    // wire-coordinate direction, perpendicular to the wires in (y, z)
    let coord_y = -angle_from_vertical.sin();
    let coord_z = angle_from_vertical.cos();
    VolumeNode::leaf(
        format!("volWire{w}"),
        BoxDims::new(0.05, 0.05, half_length),
        LocalTransform::rotation_x_then_translation(
            angle_from_vertical - FRAC_PI_2,
            0.0,
            coord_y * offset,
            coord_z * offset,
        ),
    )
}

/// A plane volume with `n_wires` wires at `angle_from_vertical`, centered
/// on the plane origin, added in reverse order.
fn plane_node(config: &SampleConfig, p: u32, x_local: f64, angle_from_vertical: f64) -> VolumeNode {
    let half_span = f64::from(config.n_wires - 1) / 2.0;
    let wires = (0..config.n_wires)
        .rev()
        .map(|w| {
            let offset = (f64::from(w) - half_span) * config.wire_pitch;
            wire_node(angle_from_vertical, offset, 90.0, w)
        })
        .collect();
    VolumeNode::with_children(
        format!("volPlane{p}"),
        BoxDims::new(0.5, 105.0, 210.0),
        LocalTransform::translation(x_local, 0.0, 0.0),
        wires,
    )
}

fn module_node(config: &SampleConfig, m: u32, x_local: f64) -> VolumeNode {
    let mut children = vec![VolumeNode::leaf(
        "volModuleActive",
        BoxDims::new(55.0, 95.0, 195.0),
        LocalTransform::translation(1.0, 0.0, 0.0),
    )];
    // planes added farthest-first so the sorter has work to do
    for p in (0..config.n_planes).rev() {
        let x_plane = -56.0 - 1.5 * f64::from(p);
        children.push(plane_node(config, p, x_plane, config.plane_angles[p as usize]));
    }
    VolumeNode::with_children(
        format!("volModule{m}"),
        BoxDims::new(60.0, 100.0, 200.0),
        LocalTransform::translation(x_local, 0.0, 0.0),
        children,
    )
}

fn enclosure_node(config: &SampleConfig, e: u32) -> VolumeNode {
    let mut children = Vec::new();
    // modules added in reverse x order
    for m in (0..config.n_modules).rev() {
        children.push(module_node(config, m, -70.0 + 140.0 * f64::from(m)));
    }
    // optical detectors added in ascending z; canonical order is descending
    for o in 0..config.n_op_dets {
        children.push(VolumeNode::leaf(
            format!("volOpDet{o}"),
            BoxDims::new(5.0, 5.0, 5.0),
            LocalTransform::translation(0.0, -100.0, -90.0 + 60.0 * f64::from(o)),
        ));
    }
    VolumeNode::with_children(
        format!("volEnclosure{e}"),
        BoxDims::new(150.0, 120.0, 250.0),
        LocalTransform::translation(config.enclosure_x(e), 0.0, 0.0),
        children,
    )
}

/// A symmetric multi-enclosure detector: the default configuration is
/// 2 enclosures x 2 modules x 3 planes x 100 wires, with planes at
/// vertical, +30 deg, and -30 deg.
pub fn symmetric_detector(config: &SampleConfig) -> VolumeNode {
    assert_eq!(
        config.plane_angles.len(),
        config.n_planes as usize,
        "one wire angle per plane required"
    );
    let mut children: Vec<VolumeNode> = (0..config.n_enclosures)
        .rev()
        .map(|e| enclosure_node(config, e))
        .collect();
    for a in 0..config.n_aux_dets {
        children.push(VolumeNode::leaf(
            format!("volAuxDet{a}"),
            BoxDims::new(50.0, 2.0, 50.0),
            LocalTransform::translation(400.0, 300.0, -100.0 + 200.0 * f64::from(a)),
        ));
    }
    VolumeNode::with_children(
        "volWorld",
        BoxDims::new(2000.0, 2000.0, 2000.0),
        LocalTransform::identity(),
        children,
    )
}

/// A single-enclosure detector whose two planes hold orthogonal wires
/// (vertical and horizontal), giving exactly known crossing points.
pub fn two_view_grid(n_wires: u32, wire_pitch: f64) -> VolumeNode {
    let config = SampleConfig {
        n_enclosures: 1,
        n_modules: 2,
        n_planes: 2,
        n_wires,
        wire_pitch,
        plane_angles: vec![0.0, FRAC_PI_2],
        n_op_dets: 0,
        n_aux_dets: 0,
    };
    symmetric_detector(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sample_shape() {
        let config = SampleConfig::default();
        let root = symmetric_detector(&config);
        assert_eq!(root.children.len(), 4); // 2 enclosures + 2 aux dets
        let enclosure = &root.children[0];
        assert!(enclosure.name.starts_with("volEnclosure"));
        assert_eq!(
            enclosure.children.len(),
            (config.n_modules + config.n_op_dets) as usize
        );
    }
}
