//! Sense wire geometry.

use std::f64::consts::PI;

use nalgebra::{Point3, Vector3};

use driftkit_core::WireId;

use crate::transform::LocalTransform;

/// A single sense wire: the finest-grained element of the detector.
///
/// The wire runs along the local z axis of its volume; its world
/// orientation is captured at construction and never changes. Sorting may
/// flip the logical direction so that all wires of a plane point the same
/// way.
#[derive(Debug, Clone)]
pub struct WireGeo {
    transform: LocalTransform,
    half_length: f64,
    center: Point3<f64>,
    theta_z: f64,
    flipped: bool,
    id: WireId,
}

impl WireGeo {
    /// Build a wire from its composed world transform and half length.
    pub fn new(transform: LocalTransform, half_length: f64) -> Self {
        let center = transform.origin();
        let end = transform.local_to_world(&Point3::new(0.0, 0.0, half_length));

        // Angle of the wire with respect to the z axis, normalized to
        // [0, pi): a wire at angle theta also runs at theta +- pi.
        let mut theta_z = ((end.z - center.z) / half_length).clamp(-1.0, 1.0).acos();
        if end.y < center.y {
            theta_z = -theta_z;
        }
        if theta_z < 0.0 {
            theta_z += PI;
        }

        Self {
            transform,
            half_length,
            center,
            theta_z,
            flipped: false,
            id: WireId::invalid(),
        }
    }

    /// Stamp the post-sort ID and direction flip.
    pub(crate) fn update_after_sorting(&mut self, id: WireId, flip: bool) {
        self.id = id;
        self.flipped = flip;
    }

    /// The wire's ID; invalid until IDs have been assigned.
    pub fn id(&self) -> WireId {
        self.id
    }

    /// The world position of the wire center.
    pub fn center(&self) -> Point3<f64> {
        self.center
    }

    /// Half the wire length.
    pub fn half_length(&self) -> f64 {
        self.half_length
    }

    /// Angle of the wire to the z axis, in [0, pi).
    pub fn theta_z(&self) -> f64 {
        self.theta_z
    }

    /// Whether sorting reversed the logical wire direction.
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Unit direction of the wire axis in the world frame, before any flip.
    pub fn raw_direction(&self) -> Vector3<f64> {
        self.transform.local_to_world_vect(&Vector3::z())
    }

    /// Unit direction of the wire axis in the world frame.
    pub fn direction(&self) -> Vector3<f64> {
        let dir = self.raw_direction();
        if self.flipped {
            -dir
        } else {
            dir
        }
    }

    /// The world position of the wire start point.
    pub fn start(&self) -> Point3<f64> {
        self.center - self.direction() * self.half_length
    }

    /// The world position of the wire end point.
    pub fn end(&self) -> Point3<f64> {
        self.center + self.direction() * self.half_length
    }

    /// Perpendicular distance from this wire to another, assumed parallel.
    pub fn pitch_to(&self, other: &WireGeo) -> f64 {
        let delta = other.center - self.center;
        let along = self.direction() * delta.dot(&self.direction());
        (delta - along).norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn wire_at(angle_from_y: f64, y: f64, z: f64) -> WireGeo {
        // local z axis rotated about x so the wire lies in the y-z plane
        WireGeo::new(
            LocalTransform::rotation_x_then_translation(angle_from_y - FRAC_PI_2, 0.0, y, z),
            50.0,
        )
    }

    #[test]
    fn test_vertical_wire_theta_z() {
        let wire = wire_at(0.0, 0.0, 0.0);
        assert!((wire.theta_z() - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_theta_z_range() {
        for angle in [-1.2, -0.5, 0.0, 0.5, 1.2] {
            let wire = wire_at(angle, 0.0, 0.0);
            assert!(wire.theta_z() >= 0.0 && wire.theta_z() < PI);
        }
    }

    #[test]
    fn test_endpoints_straddle_center() {
        let wire = wire_at(0.5, 2.0, 3.0);
        let mid = nalgebra::center(&wire.start(), &wire.end());
        assert!((mid - wire.center()).norm() < 1e-12);
    }

    #[test]
    fn test_flip_reverses_endpoints() {
        let mut wire = wire_at(0.5, 0.0, 0.0);
        let start = wire.start();
        assert!(!wire.is_flipped());
        wire.update_after_sorting(WireId::new(0, 0, 0, 0), true);
        assert!(wire.is_flipped());
        assert!((wire.end() - start).norm() < 1e-12);
    }

    #[test]
    fn test_pitch_between_parallel_wires() {
        let a = wire_at(0.0, 0.0, 0.0);
        let b = wire_at(0.0, 0.0, 0.5);
        assert!((a.pitch_to(&b) - 0.5).abs() < 1e-12);
    }
}
