//! Test doubles shared by the integration suites.

use std::collections::BTreeSet;

use smallvec::smallvec;

use driftkit_core::{ChannelId, ChannelMapError, PlaneId, Result, SignalType, View, WireId};
use driftkit_geometry::{ChannelMap, ChannelWires, EnclosureGeo};

/// Minimal strategy numbering one channel per wire in ID order; stands in
/// for the real mapping crates, which sit above this one.
#[derive(Debug, Default)]
pub struct CountingMap {
    baselines: Vec<(PlaneId, u32, u32, View)>,
    n_channels: u32,
    views: BTreeSet<View>,
    plane_ids: BTreeSet<PlaneId>,
}

impl ChannelMap for CountingMap {
    fn initialize(&mut self, enclosures: &[EnclosureGeo]) -> Result<()> {
        *self = Self::default();
        let mut channel = 0;
        for enclosure in enclosures {
            for module in enclosure.modules() {
                for plane in module.planes() {
                    self.baselines
                        .push((plane.id(), channel, plane.n_wires(), plane.view()));
                    self.views.insert(plane.view());
                    self.plane_ids.insert(plane.id());
                    channel += plane.n_wires();
                }
            }
        }
        if channel == 0 {
            return Err(ChannelMapError::EmptyMap {
                reason: "no wires".into(),
            }
            .into());
        }
        self.n_channels = channel;
        Ok(())
    }

    fn channel_count(&self) -> u32 {
        self.n_channels
    }

    fn channel_to_wires(&self, channel: ChannelId) -> ChannelWires {
        for (plane, first, n_wires, _) in &self.baselines {
            if channel.0 >= *first && channel.0 < first + n_wires {
                return smallvec![WireId::in_plane(*plane, channel.0 - first)];
            }
        }
        ChannelWires::new()
    }

    fn plane_wire_to_channel(&self, wire: WireId) -> Result<ChannelId> {
        self.baselines
            .iter()
            .find(|(plane, _, n_wires, _)| *plane == wire.plane && wire.wire < *n_wires)
            .map(|(_, first, _, _)| ChannelId(first + wire.wire))
            .ok_or_else(|| ChannelMapError::UnmappedWire { wire }.into())
    }

    fn signal_type(&self, _channel: ChannelId) -> SignalType {
        SignalType::Unknown
    }

    fn view(&self, channel: ChannelId) -> View {
        for (_, first, n_wires, view) in &self.baselines {
            if channel.0 >= *first && channel.0 < first + n_wires {
                return *view;
            }
        }
        View::Unknown
    }

    fn plane_signal_type(&self, _plane: PlaneId) -> SignalType {
        SignalType::Unknown
    }

    fn plane_view(&self, plane: PlaneId) -> View {
        self.baselines
            .iter()
            .find(|(candidate, ..)| *candidate == plane)
            .map_or(View::Unknown, |(_, _, _, view)| *view)
    }

    fn views(&self) -> &BTreeSet<View> {
        &self.views
    }

    fn plane_ids(&self) -> &BTreeSet<PlaneId> {
        &self.plane_ids
    }
}
