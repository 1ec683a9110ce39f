//! Raw volume-node tree, the input handed over by an external loader.
//!
//! The loader (GDML parser, JSON reader, test fixture) produces an
//! unordered tree of named nodes; the builder walks it matching the
//! reserved name prefixes below and materializes typed elements.

use serde::{Deserialize, Serialize};

use crate::transform::LocalTransform;

/// Name prefix marking an enclosure volume.
pub const ENCLOSURE_PREFIX: &str = "volEnclosure";
/// Name prefix marking a drift module volume.
pub const MODULE_PREFIX: &str = "volModule";
/// Name of the active sub-volume of a module.
pub const MODULE_ACTIVE_NAME: &str = "volModuleActive";
/// Name prefix marking a wire plane volume.
pub const PLANE_PREFIX: &str = "volPlane";
/// Name prefix marking a sense wire volume.
pub const WIRE_PREFIX: &str = "volWire";
/// Name prefix marking an optical detector volume.
pub const OP_DET_PREFIX: &str = "volOpDet";
/// Name prefix marking an auxiliary detector volume.
pub const AUX_DET_PREFIX: &str = "volAuxDet";

/// Bounding half-extents of a volume, in cm.
///
/// Width is along x, height along y, length along z of the volume's local
/// frame. For wire volumes only the half length (the wire half length) is
/// meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxDims {
    /// Half extent along local x.
    pub half_width: f64,
    /// Half extent along local y.
    pub half_height: f64,
    /// Half extent along local z.
    pub half_length: f64,
}

impl BoxDims {
    /// Half extents from explicit values.
    pub fn new(half_width: f64, half_height: f64, half_length: f64) -> Self {
        Self {
            half_width,
            half_height,
            half_length,
        }
    }

    /// Full extent along local z.
    pub fn length(&self) -> f64 {
        2.0 * self.half_length
    }
}

/// One node of the raw volume tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeNode {
    /// Volume name; role is recognized from its prefix.
    pub name: String,
    /// Bounding half-extents of this volume.
    pub dims: BoxDims,
    /// Transform from this node's frame to its parent's frame.
    #[serde(default)]
    pub transform: LocalTransform,
    /// Daughter volumes, in loader order.
    #[serde(default)]
    pub children: Vec<VolumeNode>,
}

impl VolumeNode {
    /// A node with no children.
    pub fn leaf(name: impl Into<String>, dims: BoxDims, transform: LocalTransform) -> Self {
        Self {
            name: name.into(),
            dims,
            transform,
            children: Vec::new(),
        }
    }

    /// A node with children.
    pub fn with_children(
        name: impl Into<String>,
        dims: BoxDims,
        transform: LocalTransform,
        children: Vec<VolumeNode>,
    ) -> Self {
        Self {
            name: name.into(),
            dims,
            transform,
            children,
        }
    }

    /// Whether this node's name carries the given role prefix.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.name.starts_with(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matching() {
        let node = VolumeNode::leaf(
            "volModule0",
            BoxDims::new(1.0, 1.0, 1.0),
            LocalTransform::identity(),
        );
        assert!(node.has_prefix(MODULE_PREFIX));
        assert!(!node.has_prefix(ENCLOSURE_PREFIX));
    }

    #[test]
    fn test_json_roundtrip() {
        let node = VolumeNode::with_children(
            "volWorld",
            BoxDims::new(1000.0, 1000.0, 1000.0),
            LocalTransform::identity(),
            vec![VolumeNode::leaf(
                "volAuxDet0",
                BoxDims::new(10.0, 1.0, 10.0),
                LocalTransform::translation(0.0, 300.0, 0.0),
            )],
        );
        let text = serde_json::to_string(&node).unwrap();
        let back: VolumeNode = serde_json::from_str(&text).unwrap();
        assert_eq!(back.children.len(), 1);
        assert_eq!(back.children[0].name, "volAuxDet0");
    }
}
