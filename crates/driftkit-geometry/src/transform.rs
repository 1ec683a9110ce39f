//! Affine local-to-world transforms.

use nalgebra::{Isometry3, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// An affine local-to-world mapping (rotation + translation).
///
/// Every geometry element owns one, composed along the node path from the
/// tree root at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalTransform {
    iso: Isometry3<f64>,
}

impl LocalTransform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            iso: Isometry3::identity(),
        }
    }

    /// A pure translation.
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            iso: Isometry3::from_parts(
                Translation3::new(x, y, z),
                UnitQuaternion::identity(),
            ),
        }
    }

    /// A rotation about the world x axis followed by a translation.
    pub fn rotation_x_then_translation(angle: f64, x: f64, y: f64, z: f64) -> Self {
        let rot = UnitQuaternion::from_rotation_matrix(&Rotation3::from_axis_angle(
            &Vector3::x_axis(),
            angle,
        ));
        Self {
            iso: Isometry3::from_parts(Translation3::new(x, y, z), rot),
        }
    }

    /// Build from rotation and translation parts.
    pub fn from_parts(translation: Vector3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self {
            iso: Isometry3::from_parts(translation.into(), rotation),
        }
    }

    /// This transform followed by `child`, i.e. the transform of a child
    /// node whose local transform is `child`.
    pub fn compose(&self, child: &LocalTransform) -> Self {
        Self {
            iso: self.iso * child.iso,
        }
    }

    /// Map a point from the local frame to the world frame.
    pub fn local_to_world(&self, local: &Point3<f64>) -> Point3<f64> {
        self.iso * local
    }

    /// Map a direction from the local frame to the world frame
    /// (rotation only).
    pub fn local_to_world_vect(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.iso.rotation * local
    }

    /// Map a point from the world frame to the local frame.
    pub fn world_to_local(&self, world: &Point3<f64>) -> Point3<f64> {
        self.iso.inverse_transform_point(world)
    }

    /// Map a direction from the world frame to the local frame
    /// (rotation only).
    pub fn world_to_local_vect(&self, world: &Vector3<f64>) -> Vector3<f64> {
        self.iso.rotation.inverse_transform_vector(world)
    }

    /// The world position of the local origin.
    pub fn origin(&self) -> Point3<f64> {
        self.iso.translation.vector.into()
    }
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_compose_translations() {
        let parent = LocalTransform::translation(10.0, 0.0, 0.0);
        let child = LocalTransform::translation(0.0, 5.0, 0.0);
        let world = parent.compose(&child).local_to_world(&Point3::origin());
        assert_eq!(world, Point3::new(10.0, 5.0, 0.0));
    }

    #[test]
    fn test_roundtrip() {
        let t = LocalTransform::rotation_x_then_translation(0.3, 1.0, -2.0, 3.0);
        let p = Point3::new(0.5, 0.25, -0.75);
        let back = t.world_to_local(&t.local_to_world(&p));
        assert!((back - p).norm() < 1e-12);
    }

    #[test]
    fn test_rotation_x_maps_z_axis() {
        // rotating by -pi/2 about x sends the local z axis onto +y
        let t = LocalTransform::rotation_x_then_translation(-FRAC_PI_2, 0.0, 0.0, 0.0);
        let dir = t.local_to_world_vect(&Vector3::z());
        assert!((dir - Vector3::y()).norm() < 1e-12);
        let back = t.world_to_local_vect(&dir);
        assert!((back - Vector3::z()).norm() < 1e-12);
    }
}
