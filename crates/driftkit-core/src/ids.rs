//! Hierarchical element identifiers.
//!
//! Each detector level extends the previous one by a single 0-based index:
//! enclosure, module within enclosure, plane within module, wire within
//! plane. IDs compare lexicographically by nesting order (enclosure first,
//! wire last) and the comparison ignores the validity flag, so sorting a
//! mixed list is total and reproducible. The reserved maximum index is the
//! invalid sentinel and must never be used as a real index.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Reserved index value marking an invalid ID component.
pub const INVALID_INDEX: u32 = u32::MAX;

/// Identifier of an enclosure, the outermost detector sub-volume.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnclosureId {
    /// Index of the enclosure within the detector.
    pub enclosure: u32,
    /// Whether this ID points to a valid element.
    pub valid: bool,
}

impl EnclosureId {
    /// Valid ID of the enclosure with the given index.
    pub fn new(enclosure: u32) -> Self {
        Self {
            enclosure,
            valid: true,
        }
    }

    /// The invalid sentinel ID.
    pub fn invalid() -> Self {
        Self {
            enclosure: INVALID_INDEX,
            valid: false,
        }
    }

    /// Whether this ID points to a valid element.
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl PartialEq for EnclosureId {
    fn eq(&self, other: &Self) -> bool {
        self.enclosure == other.enclosure
    }
}

impl Eq for EnclosureId {}

impl PartialOrd for EnclosureId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EnclosureId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.enclosure.cmp(&other.enclosure)
    }
}

impl Hash for EnclosureId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.enclosure.hash(state);
    }
}

impl fmt::Display for EnclosureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E:{}", self.enclosure)
    }
}

/// Identifier of a drift module within an enclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleId {
    /// The enclosure housing the module.
    pub enclosure: EnclosureId,
    /// Index of the module within its enclosure.
    pub module: u32,
}

impl ModuleId {
    /// Valid ID of the module with the given indices.
    pub fn new(enclosure: u32, module: u32) -> Self {
        Self {
            enclosure: EnclosureId::new(enclosure),
            module,
        }
    }

    /// Valid ID of a module inside an already-identified enclosure.
    pub fn in_enclosure(enclosure: EnclosureId, module: u32) -> Self {
        Self { enclosure, module }
    }

    /// The invalid sentinel ID.
    pub fn invalid() -> Self {
        Self {
            enclosure: EnclosureId::invalid(),
            module: INVALID_INDEX,
        }
    }

    /// Whether this ID points to a valid element.
    pub fn is_valid(&self) -> bool {
        self.enclosure.is_valid()
    }

    /// The enclosure part of this ID.
    pub fn enclosure_id(&self) -> EnclosureId {
        self.enclosure
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} M:{}", self.enclosure, self.module)
    }
}

/// Identifier of a wire plane within a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlaneId {
    /// The module housing the plane.
    pub module: ModuleId,
    /// Index of the plane within its module.
    pub plane: u32,
}

impl PlaneId {
    /// Valid ID of the plane with the given indices.
    pub fn new(enclosure: u32, module: u32, plane: u32) -> Self {
        Self {
            module: ModuleId::new(enclosure, module),
            plane,
        }
    }

    /// Valid ID of a plane inside an already-identified module.
    pub fn in_module(module: ModuleId, plane: u32) -> Self {
        Self { module, plane }
    }

    /// The invalid sentinel ID.
    pub fn invalid() -> Self {
        Self {
            module: ModuleId::invalid(),
            plane: INVALID_INDEX,
        }
    }

    /// Whether this ID points to a valid element.
    pub fn is_valid(&self) -> bool {
        self.module.is_valid()
    }

    /// The module part of this ID.
    pub fn module_id(&self) -> ModuleId {
        self.module
    }
}

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} P:{}", self.module, self.plane)
    }
}

/// Identifier of a single sense wire within a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WireId {
    /// The plane housing the wire.
    pub plane: PlaneId,
    /// Index of the wire within its plane.
    pub wire: u32,
}

impl WireId {
    /// Valid ID of the wire with the given indices.
    pub fn new(enclosure: u32, module: u32, plane: u32, wire: u32) -> Self {
        Self {
            plane: PlaneId::new(enclosure, module, plane),
            wire,
        }
    }

    /// Valid ID of a wire inside an already-identified plane.
    pub fn in_plane(plane: PlaneId, wire: u32) -> Self {
        Self { plane, wire }
    }

    /// The invalid sentinel ID.
    pub fn invalid() -> Self {
        Self {
            plane: PlaneId::invalid(),
            wire: INVALID_INDEX,
        }
    }

    /// Whether this ID points to a valid element.
    pub fn is_valid(&self) -> bool {
        self.plane.is_valid()
    }

    /// The plane part of this ID.
    pub fn plane_id(&self) -> PlaneId {
        self.plane
    }

    /// The module part of this ID.
    pub fn module_id(&self) -> ModuleId {
        self.plane.module
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} W:{}", self.plane, self.wire)
    }
}

/// Physical readout channel identifier.
///
/// A channel may aggregate several wires; a wire maps to exactly one
/// channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u32);

impl ChannelId {
    /// The invalid sentinel channel.
    pub const INVALID: ChannelId = ChannelId(u32::MAX);

    /// Whether this is a real channel number.
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

impl From<u32> for ChannelId {
    fn from(raw: u32) -> Self {
        ChannelId(raw)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ch:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicographic_order() {
        let a = WireId::new(0, 1, 2, 3);
        let b = WireId::new(0, 1, 2, 4);
        let c = WireId::new(0, 2, 0, 0);
        let d = WireId::new(1, 0, 0, 0);

        assert!(a < b);
        assert!(b < c);
        assert!(c < d);

        let mut shuffled = vec![d, b, c, a];
        shuffled.sort();
        assert_eq!(shuffled, vec![a, b, c, d]);
    }

    #[test]
    fn test_comparison_ignores_validity() {
        let mut flagged = EnclosureId::new(7);
        flagged.valid = false;
        assert_eq!(flagged, EnclosureId::new(7));
        assert_eq!(flagged.cmp(&EnclosureId::new(7)), Ordering::Equal);
    }

    #[test]
    fn test_invalid_sentinel_sorts_last() {
        let real = WireId::new(3, 3, 3, 3);
        let invalid = WireId::invalid();
        assert!(!invalid.is_valid());
        assert_eq!(invalid.wire, INVALID_INDEX);
        assert!(real < invalid);
    }

    #[test]
    fn test_display_prefixes() {
        let wid = WireId::new(0, 1, 2, 3);
        assert_eq!(wid.to_string(), "E:0 M:1 P:2 W:3");
        assert_eq!(wid.plane_id().to_string(), "E:0 M:1 P:2");
        assert_eq!(wid.module_id().to_string(), "E:0 M:1");
    }

    #[test]
    fn test_serde_roundtrip() {
        let wid = WireId::new(1, 2, 3, 4);
        let text = serde_json::to_string(&wid).unwrap();
        let back: WireId = serde_json::from_str(&text).unwrap();
        assert_eq!(back, wid);
        assert!(back.is_valid());
    }

    #[test]
    fn test_channel_id_validity() {
        assert!(ChannelId(0).is_valid());
        assert!(!ChannelId::INVALID.is_valid());
        assert_eq!(ChannelId::from(12).to_string(), "Ch:12");
    }
}
