//! Wire plane geometry.

use std::f64::consts::FRAC_PI_2;

use nalgebra::Point3;
use tracing::debug;

use driftkit_core::{GeometryError, PlaneId, Result, View, WireId};

use crate::node::BoxDims;
use crate::sorter::GeoObjectSorter;
use crate::transform::LocalTransform;

use super::wire::WireGeo;

/// Wire angle within this band of vertical counts as a Z (vertical-wire)
/// plane.
const VERTICAL_BAND: f64 = 1e-3;

/// A plane of parallel sense wires sharing one orientation and pitch.
///
/// Wire planes are transverse to the x drift axis, so the wire-coordinate
/// frame lives in (y, z). After sorting, the plane caches the closed-form
/// projection that turns a (y, z) position into a continuous wire index:
/// an orthogonal unit vector scaled by 1/pitch plus the first wire's
/// offset along it.
#[derive(Debug, Clone)]
pub struct PlaneGeo {
    transform: LocalTransform,
    dims: BoxDims,
    wires: Vec<WireGeo>,
    id: PlaneId,
    view: View,
    wire_pitch: f64,
    phi_z: f64,
    sin_phi_z: f64,
    cos_phi_z: f64,
    orth_y: f64,
    orth_z: f64,
    first_wire_proj: f64,
}

impl PlaneGeo {
    /// Build a plane from its composed world transform, half-extents, and
    /// wires in discovery order.
    pub fn new(transform: LocalTransform, dims: BoxDims, wires: Vec<WireGeo>) -> Self {
        Self {
            transform,
            dims,
            wires,
            id: PlaneId::invalid(),
            view: View::Unknown,
            wire_pitch: 0.0,
            phi_z: 0.0,
            sin_phi_z: 0.0,
            cos_phi_z: 1.0,
            orth_y: 0.0,
            orth_z: 0.0,
            first_wire_proj: 0.0,
        }
    }

    /// Reorder the wires with the active sorting strategy.
    pub(crate) fn sort_wires(&mut self, sorter: &dyn GeoObjectSorter) {
        sorter.sort_wires(&mut self.wires);
    }

    /// Stamp the post-sort ID, renumber the wires, and refresh every
    /// derived quantity (pitch, wire-coordinate projection, view).
    pub(crate) fn update_after_sorting(&mut self, id: PlaneId) {
        self.id = id;

        // all wires of a plane point the same way; the first wire sets the
        // reference and disagreeing wires are flipped
        let reference = self.wires[0].raw_direction();
        for (wire_no, wire) in self.wires.iter_mut().enumerate() {
            let flip = wire.raw_direction().dot(&reference) < 0.0;
            wire.update_after_sorting(WireId::in_plane(id, wire_no as u32), flip);
        }

        if self.wires.len() > 1 {
            let first = self.wires[0].center();
            let second = self.wires[1].center();
            self.wire_pitch = self.wires[0].pitch_to(&self.wires[1]);

            // wire-coordinate direction: from wire 0 toward wire 1,
            // projected on the transverse (y, z) frame
            let dy = second.y - first.y;
            let dz = second.z - first.z;
            let norm = (dy * dy + dz * dz).sqrt();
            self.sin_phi_z = dy / norm;
            self.cos_phi_z = dz / norm;
            self.phi_z = self.sin_phi_z.atan2(self.cos_phi_z);

            // scaled by 1/pitch so the projection is in wire-index units
            self.orth_y = self.sin_phi_z / self.wire_pitch;
            self.orth_z = self.cos_phi_z / self.wire_pitch;
            self.first_wire_proj = first.y * self.orth_y + first.z * self.orth_z;
        } else {
            debug!(plane = %id, "single-wire plane, no pitch to derive");
        }

        self.view = classify_view(self.theta_z());
    }

    /// The plane's ID; invalid until IDs have been assigned.
    pub fn id(&self) -> PlaneId {
        self.id
    }

    /// Orientation classification of this plane's wires.
    pub fn view(&self) -> View {
        self.view
    }

    /// The world position of the plane center.
    pub fn center(&self) -> Point3<f64> {
        self.transform.origin()
    }

    /// Bounding half-extents of the plane volume.
    pub fn dims(&self) -> &BoxDims {
        &self.dims
    }

    /// Number of wires in this plane.
    pub fn n_wires(&self) -> u32 {
        self.wires.len() as u32
    }

    /// The wire at the given index, if any.
    pub fn wire(&self, wire: u32) -> Option<&WireGeo> {
        self.wires.get(wire as usize)
    }

    /// All wires, in sorted order.
    pub fn wires(&self) -> &[WireGeo] {
        &self.wires
    }

    /// The first wire of the plane.
    pub fn first_wire(&self) -> &WireGeo {
        &self.wires[0]
    }

    /// Distance between adjacent wires.
    pub fn wire_pitch(&self) -> f64 {
        self.wire_pitch
    }

    /// Angle of the wires to the z axis, in [0, pi).
    pub fn theta_z(&self) -> f64 {
        self.wires[0].theta_z()
    }

    /// Angle of the wire-coordinate direction to the z axis.
    pub fn phi_z(&self) -> f64 {
        self.phi_z
    }

    /// Sine of [`Self::phi_z`].
    pub fn sin_phi_z(&self) -> f64 {
        self.sin_phi_z
    }

    /// Cosine of [`Self::phi_z`].
    pub fn cos_phi_z(&self) -> f64 {
        self.cos_phi_z
    }

    /// Continuous wire coordinate of a transverse position: integral
    /// values land on wire centers.
    pub fn wire_coordinate(&self, y: f64, z: f64) -> f64 {
        y * self.orth_y + z * self.orth_z - self.first_wire_proj
    }

    /// The wire nearest to a world position.
    ///
    /// Out-of-range positions yield [`GeometryError::InvalidWireIndex`]
    /// carrying both the raw index and the closest valid one, so callers
    /// can clamp instead of failing.
    pub fn nearest_wire_id(&self, point: &Point3<f64>) -> Result<WireId> {
        let coord = self.wire_coordinate(point.y, point.z);
        let nearest = (0.5 + coord).floor() as i64;

        if nearest < 0 || nearest >= i64::from(self.n_wires()) {
            let clamped = if nearest < 0 { 0 } else { self.n_wires() - 1 };
            return Err(GeometryError::InvalidWireIndex {
                plane: self.id,
                raw: nearest,
                clamped,
            }
            .into());
        }

        Ok(WireId::in_plane(self.id, nearest as u32))
    }
}

/// Classify a plane view from its wire angle to the z axis.
fn classify_view(theta_z: f64) -> View {
    let tilt = theta_z - FRAC_PI_2;
    if tilt.abs() < VERTICAL_BAND {
        View::Z
    } else if tilt < 0.0 {
        View::U
    } else {
        View::V
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::LocalTransform;

    /// A plane of `n` vertical wires at pitch `pitch` along z.
    fn vertical_plane(n: u32, pitch: f64) -> PlaneGeo {
        let wires = (0..n)
            .map(|w| {
                WireGeo::new(
                    LocalTransform::rotation_x_then_translation(
                        -FRAC_PI_2,
                        0.0,
                        0.0,
                        w as f64 * pitch,
                    ),
                    100.0,
                )
            })
            .collect();
        let mut plane = PlaneGeo::new(
            LocalTransform::identity(),
            BoxDims::new(0.1, 100.0, n as f64 * pitch / 2.0),
            wires,
        );
        plane.update_after_sorting(PlaneId::new(0, 0, 0));
        plane
    }

    #[test]
    fn test_pitch_and_view() {
        let plane = vertical_plane(10, 0.4);
        assert!((plane.wire_pitch() - 0.4).abs() < 1e-12);
        assert_eq!(plane.view(), View::Z);
    }

    #[test]
    fn test_wire_coordinate_integral_on_centers() {
        let plane = vertical_plane(10, 0.4);
        for w in [0u32, 4, 9] {
            let center = plane.wire(w).unwrap().center();
            let coord = plane.wire_coordinate(center.y, center.z);
            assert!((coord - w as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn test_nearest_wire_at_center_and_half_pitch() {
        let plane = vertical_plane(10, 0.4);
        let center = plane.wire(4).unwrap().center();

        let at_center = plane.nearest_wire_id(&center).unwrap();
        assert_eq!(at_center.wire, 4);

        let toward_next = Point3::new(center.x, center.y, center.z + 0.55 * 0.4);
        assert_eq!(plane.nearest_wire_id(&toward_next).unwrap().wire, 5);

        let toward_prev = Point3::new(center.x, center.y, center.z - 0.55 * 0.4);
        assert_eq!(plane.nearest_wire_id(&toward_prev).unwrap().wire, 3);
    }

    #[test]
    fn test_nearest_wire_out_of_range() {
        let plane = vertical_plane(10, 0.4);
        let outside = Point3::new(0.0, 0.0, -10.0);
        let err = plane.nearest_wire_id(&outside).unwrap_err();
        assert!(err.is_invalid_wire_index());
        assert_eq!(err.suggested_wire(), Some(0));
    }
}
