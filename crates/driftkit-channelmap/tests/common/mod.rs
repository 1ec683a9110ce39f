//! Shared fixtures for the channel map suites.

use std::f64::consts::FRAC_PI_2;

use driftkit_geometry::{BoxDims, LocalTransform, VolumeNode};

/// A wire volume in the y-z plane at `angle_from_vertical`, centered at
/// (y, z) in plane-local coordinates.
fn wire_node(w: u32, angle_from_vertical: f64, y: f64, z: f64) -> VolumeNode {
    VolumeNode::leaf(
        format!("volWire{w}"),
        BoxDims::new(0.05, 0.05, 40.0),
        LocalTransform::rotation_x_then_translation(angle_from_vertical - FRAC_PI_2, 0.0, y, z),
    )
}

/// A wrapped plane: `k` wire segments on each of two faces (y = +20 and
/// y = -20), at the same z positions, so each winding crosses the pair of
/// modules twice.
fn wrapped_plane(p: u32, x_local: f64, angle_from_vertical: f64, k: u32, pitch: f64) -> VolumeNode {
    let half_span = f64::from(k - 1) / 2.0;
    let mut wires = Vec::new();
    for w in 0..k {
        let z = (f64::from(w) - half_span) * pitch;
        wires.push(wire_node(w, angle_from_vertical, 20.0, z));
        wires.push(wire_node(k + w, angle_from_vertical, -20.0, z));
    }
    VolumeNode::with_children(
        format!("volPlane{p}"),
        BoxDims::new(0.5, 60.0, 60.0),
        LocalTransform::translation(x_local, 0.0, 0.0),
        wires,
    )
}

/// A plain vertical-wire plane with `k` wires along z.
fn vertical_plane(p: u32, x_local: f64, k: u32, pitch: f64) -> VolumeNode {
    let half_span = f64::from(k - 1) / 2.0;
    let wires = (0..k)
        .map(|w| wire_node(w, 0.0, 0.0, (f64::from(w) - half_span) * pitch))
        .collect();
    VolumeNode::with_children(
        format!("volPlane{p}"),
        BoxDims::new(0.5, 60.0, 60.0),
        LocalTransform::translation(x_local, 0.0, 0.0),
        wires,
    )
}

/// One enclosure with a pair of modules whose induction planes wrap: the
/// U and V planes carry `2k` wire segments each, the collection plane `k`
/// vertical wires.
pub fn wrapped_detector(k: u32, pitch: f64) -> VolumeNode {
    let angle = 35f64.to_radians();
    let modules = (0..2)
        .map(|m| {
            VolumeNode::with_children(
                format!("volModule{m}"),
                BoxDims::new(60.0, 100.0, 200.0),
                LocalTransform::translation(-70.0 + 140.0 * f64::from(m), 0.0, 0.0),
                vec![
                    wrapped_plane(0, -56.0, angle, k, pitch),
                    wrapped_plane(1, -57.5, -angle, k, pitch),
                    vertical_plane(2, -59.0, k, pitch),
                ],
            )
        })
        .collect();
    let enclosure = VolumeNode::with_children(
        "volEnclosure0",
        BoxDims::new(150.0, 120.0, 250.0),
        LocalTransform::translation(200.0, 0.0, 0.0),
        modules,
    );
    VolumeNode::with_children(
        "volWorld",
        BoxDims::new(2000.0, 2000.0, 2000.0),
        LocalTransform::identity(),
        vec![enclosure],
    )
}
