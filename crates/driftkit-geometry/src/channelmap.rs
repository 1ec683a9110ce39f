//! Pluggable wire-to-channel mapping.
//!
//! Which concrete strategy to use is decided externally and handed to the
//! geometry core as an already-constructed trait object. The core
//! initializes it exactly once, after sorting and ID assignment; from then
//! on the mapping is read-only, and a topology change requires a full
//! rebuild from a freshly sorted tree.

use std::collections::BTreeSet;

use smallvec::SmallVec;

use driftkit_core::{ChannelId, PlaneId, Result, SignalType, View, WireId};

use crate::elements::EnclosureGeo;

/// Wire list returned per channel; almost always one or two entries.
pub type ChannelWires = SmallVec<[WireId; 2]>;

/// A wire/channel mapping strategy.
pub trait ChannelMap: Send + Sync {
    /// Build the mapping from the sorted, ID-stamped element tree.
    ///
    /// Called exactly once per geometry load; an error here is fatal to
    /// the load, so callers never observe a partially built map.
    fn initialize(&mut self, enclosures: &[EnclosureGeo]) -> Result<()>;

    /// Total number of readout channels.
    fn channel_count(&self) -> u32;

    /// Every wire read out by the channel.
    ///
    /// An out-of-range or unmapped channel yields an empty list, not an
    /// error; absence is a clean, expected answer.
    fn channel_to_wires(&self, channel: ChannelId) -> ChannelWires;

    /// The channel reading out the wire.
    fn plane_wire_to_channel(&self, wire: WireId) -> Result<ChannelId>;

    /// Signal classification of the channel.
    fn signal_type(&self, channel: ChannelId) -> SignalType;

    /// Orientation classification of the channel.
    fn view(&self, channel: ChannelId) -> View;

    /// Signal classification of a plane.
    fn plane_signal_type(&self, plane: PlaneId) -> SignalType;

    /// Orientation classification of a plane.
    fn plane_view(&self, plane: PlaneId) -> View;

    /// All views present in the detector.
    fn views(&self) -> &BTreeSet<View>;

    /// All plane IDs covered by the mapping.
    fn plane_ids(&self) -> &BTreeSet<PlaneId>;

    /// Whether the channel exists in the mapping.
    fn has_channel(&self, channel: ChannelId) -> bool {
        channel.0 < self.channel_count()
    }
}
