//! The standard one-channel-per-wire mapping.

use std::collections::BTreeSet;

use smallvec::smallvec;
use tracing::{info, warn};

use driftkit_core::{ChannelId, ChannelMapError, PlaneId, Result, SignalType, View, WireId};
use driftkit_geometry::{ChannelMap, ChannelWires, EnclosureGeo};

/// Per-plane mapping data.
#[derive(Debug, Clone, Copy)]
struct PlaneEntry {
    plane: PlaneId,
    first_channel: u32,
    n_wires: u32,
    view: View,
    signal: SignalType,
}

/// Channel map with exactly one channel per wire.
///
/// Channels are numbered contiguously in (enclosure, module, plane, wire)
/// order, so the per-plane baselines fully describe the mapping. The last
/// plane of each module collects charge; the planes before it induct.
#[derive(Debug, Default)]
pub struct StandardChannelMap {
    /// Plane entries in channel order; channel lookup binary-searches the
    /// baselines.
    entries: Vec<PlaneEntry>,
    /// `entries` index per plane, addressed `[enclosure][module][plane]`.
    plane_index: Vec<Vec<Vec<usize>>>,
    n_channels: u32,
    views: BTreeSet<View>,
    plane_ids: BTreeSet<PlaneId>,
}

impl StandardChannelMap {
    /// An uninitialized map; [`ChannelMap::initialize`] populates it.
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry covering a channel, if the channel is mapped.
    fn entry_for_channel(&self, channel: ChannelId) -> Option<&PlaneEntry> {
        if channel.0 >= self.n_channels {
            return None;
        }
        let index = self
            .entries
            .partition_point(|entry| entry.first_channel <= channel.0);
        self.entries.get(index.checked_sub(1)?)
    }

    fn entry_for_plane(&self, plane: PlaneId) -> Option<&PlaneEntry> {
        if !plane.is_valid() {
            return None;
        }
        let index = *self
            .plane_index
            .get(plane.module.enclosure.enclosure as usize)?
            .get(plane.module.module as usize)?
            .get(plane.plane as usize)?;
        self.entries.get(index)
    }
}

impl ChannelMap for StandardChannelMap {
    fn initialize(&mut self, enclosures: &[EnclosureGeo]) -> Result<()> {
        // rebuilt wholesale on every call
        *self = Self::default();

        let mut channel = 0u32;
        for enclosure in enclosures {
            let mut enclosure_index = Vec::with_capacity(enclosure.n_modules() as usize);
            for module in enclosure.modules() {
                let n_planes = module.n_planes();
                let mut module_index = Vec::with_capacity(n_planes as usize);
                for (p, plane) in module.planes().iter().enumerate() {
                    let plane_id = plane.id();
                    if !plane_id.is_valid() {
                        return Err(ChannelMapError::Unsupported {
                            reason: "element IDs were never assigned".into(),
                        }
                        .into());
                    }

                    let signal = if p as u32 == n_planes - 1 {
                        SignalType::Collection
                    } else {
                        SignalType::Induction
                    };
                    module_index.push(self.entries.len());
                    self.entries.push(PlaneEntry {
                        plane: plane_id,
                        first_channel: channel,
                        n_wires: plane.n_wires(),
                        view: plane.view(),
                        signal,
                    });
                    self.views.insert(plane.view());
                    self.plane_ids.insert(plane_id);
                    channel += plane.n_wires();
                }
                enclosure_index.push(module_index);
            }
            self.plane_index.push(enclosure_index);
        }

        if channel == 0 {
            return Err(ChannelMapError::EmptyMap {
                reason: "no wires in any plane".into(),
            }
            .into());
        }
        self.n_channels = channel;
        info!(channels = self.n_channels, "standard channel map initialized");
        Ok(())
    }

    fn channel_count(&self) -> u32 {
        self.n_channels
    }

    fn channel_to_wires(&self, channel: ChannelId) -> ChannelWires {
        match self.entry_for_channel(channel) {
            Some(entry) => {
                smallvec![WireId::in_plane(entry.plane, channel.0 - entry.first_channel)]
            }
            None => ChannelWires::new(),
        }
    }

    fn plane_wire_to_channel(&self, wire: WireId) -> Result<ChannelId> {
        let entry = self
            .entry_for_plane(wire.plane)
            .filter(|entry| wire.wire < entry.n_wires)
            .ok_or(ChannelMapError::UnmappedWire { wire })?;
        Ok(ChannelId(entry.first_channel + wire.wire))
    }

    fn signal_type(&self, channel: ChannelId) -> SignalType {
        match self.entry_for_channel(channel) {
            Some(entry) => entry.signal,
            None => {
                warn!(%channel, "channel not given a signal type");
                SignalType::Unknown
            }
        }
    }

    fn view(&self, channel: ChannelId) -> View {
        match self.entry_for_channel(channel) {
            Some(entry) => entry.view,
            None => {
                warn!(%channel, "channel not given a view");
                View::Unknown
            }
        }
    }

    fn plane_signal_type(&self, plane: PlaneId) -> SignalType {
        self.entry_for_plane(plane)
            .map_or(SignalType::Unknown, |entry| entry.signal)
    }

    fn plane_view(&self, plane: PlaneId) -> View {
        self.entry_for_plane(plane)
            .map_or(View::Unknown, |entry| entry.view)
    }

    fn views(&self) -> &BTreeSet<View> {
        &self.views
    }

    fn plane_ids(&self) -> &BTreeSet<PlaneId> {
        &self.plane_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftkit_geometry::samples::{self, SampleConfig};
    use driftkit_geometry::{GeometryConfig, GeometryCore, StandardSorter};

    fn small_geometry() -> GeometryCore {
        let config = SampleConfig {
            n_wires: 10,
            ..SampleConfig::default()
        };
        let root = samples::symmetric_detector(&config);
        let mut geometry = GeometryCore::load(&GeometryConfig::default(), &root).unwrap();
        geometry
            .apply_channel_map(&StandardSorter, Box::new(StandardChannelMap::new()))
            .unwrap();
        geometry
    }

    #[test]
    fn test_channel_count_covers_every_wire() {
        let geometry = small_geometry();
        // 2 enclosures x 2 modules x 3 planes x 10 wires
        assert_eq!(geometry.channel_count().unwrap(), 120);
    }

    #[test]
    fn test_channels_are_contiguous_in_id_order() {
        let geometry = small_geometry();
        let mut expected = 0u32;
        for wire in geometry.wire_ids() {
            let channel = geometry.plane_wire_to_channel(wire).unwrap();
            assert_eq!(channel.0, expected);
            expected += 1;
        }
    }

    #[test]
    fn test_unmapped_channel_yields_empty_list() {
        let geometry = small_geometry();
        let beyond = ChannelId(geometry.channel_count().unwrap());
        assert!(geometry.channel_to_wires(beyond).unwrap().is_empty());
        assert!(!geometry.has_channel(beyond));
    }

    #[test]
    fn test_last_plane_collects() {
        let geometry = small_geometry();
        let plane_ids: Vec<_> = geometry.plane_ids().collect();
        for plane in plane_ids {
            let expected = if plane.plane == 2 {
                SignalType::Collection
            } else {
                SignalType::Induction
            };
            assert_eq!(geometry.plane_signal_type(plane).unwrap(), expected);
        }
    }
}
