//! Typed geometry elements materialized from the raw volume tree.
//!
//! Ownership is strictly tree-shaped: an enclosure exclusively owns its
//! modules and optical detectors, a module its planes, a plane its wires.
//! There are no back-pointers; navigation upward goes through value-based
//! ID lookups on the geometry core.

mod auxdet;
mod enclosure;
mod module;
mod opdet;
mod plane;
mod wire;

pub use auxdet::AuxDetGeo;
pub use enclosure::EnclosureGeo;
pub use module::ModuleGeo;
pub use opdet::OpDetGeo;
pub use plane::PlaneGeo;
pub use wire::WireGeo;

use nalgebra::Point3;

use crate::node::BoxDims;
use crate::transform::LocalTransform;

/// World-frame bounding box as `[x_min, x_max, y_min, y_max, z_min, z_max]`.
///
/// Computed by transforming all eight local corners, so boxes stay correct
/// for rotated volumes.
pub(crate) fn world_bounds(transform: &LocalTransform, dims: &BoxDims) -> [f64; 6] {
    let mut bounds = [
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
    ];
    for sx in [-1.0, 1.0] {
        for sy in [-1.0, 1.0] {
            for sz in [-1.0, 1.0] {
                let corner = transform.local_to_world(&Point3::new(
                    sx * dims.half_width,
                    sy * dims.half_height,
                    sz * dims.half_length,
                ));
                bounds[0] = bounds[0].min(corner.x);
                bounds[1] = bounds[1].max(corner.x);
                bounds[2] = bounds[2].min(corner.y);
                bounds[3] = bounds[3].max(corner.y);
                bounds[4] = bounds[4].min(corner.z);
                bounds[5] = bounds[5].max(corner.z);
            }
        }
    }
    bounds
}

/// Multiplicative containment test against a world bounding box.
///
/// The wiggle factor is applied to every face coordinate as-is; for
/// negative coordinates this shrinks rather than grows the tolerated box
/// on that side, which is the historical behavior callers rely on.
pub(crate) fn bounds_contain(bounds: &[f64; 6], point: &Point3<f64>, wiggle: f64) -> bool {
    point.x >= bounds[0] * wiggle
        && point.x <= bounds[1] * wiggle
        && point.y >= bounds[2] * wiggle
        && point.y <= bounds[3] * wiggle
        && point.z >= bounds[4] * wiggle
        && point.z <= bounds[5] * wiggle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_bounds_axis_aligned() {
        let t = LocalTransform::translation(10.0, 20.0, 30.0);
        let dims = BoxDims::new(1.0, 2.0, 3.0);
        let b = world_bounds(&t, &dims);
        assert_eq!(b, [9.0, 11.0, 18.0, 22.0, 27.0, 33.0]);
    }

    #[test]
    fn test_bounds_contain_with_wiggle() {
        let b = [0.0, 10.0, 0.0, 10.0, 0.0, 10.0];
        let wiggle = 1.0 + 1e-4;
        assert!(bounds_contain(
            &b,
            &Point3::new(10.0005, 5.0, 5.0),
            wiggle
        ));
        assert!(!bounds_contain(&b, &Point3::new(10.1, 5.0, 5.0), wiggle));
    }
}
