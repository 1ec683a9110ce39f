//! Wrapped-wire channel mapping.
//!
//! For detectors whose induction wires wind around a frame shared by two
//! adjacent drift modules, a readout channel sees every wire segment of
//! one winding: 1..N wires per channel. Modules pair up as (2a, 2a+1);
//! channel numbers restart after twice the anchored-wire count of the
//! plane, once for each face of the pair.

use std::collections::BTreeSet;

use nalgebra::Point3;
use smallvec::SmallVec;
use tracing::{info, warn};

use driftkit_core::{ChannelId, ChannelMapError, PlaneId, Result, SignalType, View, WireId};
use driftkit_geometry::{
    AuxDetGeo, ChannelMap, ChannelWires, EnclosureGeo, GeoObjectSorter, ModuleGeo, OpDetGeo,
    PlaneGeo, StandardSorter, WireGeo,
};

/// Sibling ordering for wrapped-wire detectors.
///
/// Identical to the standard convention except for wires: the segments of
/// one face come first (decreasing y), each face ordered along z, so that
/// the anchored segments of a plane form a contiguous prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct WrappedSorter;

impl GeoObjectSorter for WrappedSorter {
    fn sort_enclosures(&self, enclosures: &mut [EnclosureGeo]) {
        StandardSorter.sort_enclosures(enclosures);
    }

    fn sort_modules(&self, modules: &mut [ModuleGeo]) {
        StandardSorter.sort_modules(modules);
    }

    fn sort_planes(&self, planes: &mut [PlaneGeo], module_center: &Point3<f64>) {
        StandardSorter.sort_planes(planes, module_center);
    }

    fn sort_wires(&self, wires: &mut [WireGeo]) {
        wires.sort_by(|a, b| {
            let (ca, cb) = (a.center(), b.center());
            cb.y.total_cmp(&ca.y).then(ca.z.total_cmp(&cb.z))
        });
    }

    fn sort_op_dets(&self, op_dets: &mut [OpDetGeo]) {
        StandardSorter.sort_op_dets(op_dets);
    }

    fn sort_aux_dets(&self, aux_dets: &mut [AuxDetGeo]) {
        StandardSorter.sort_aux_dets(aux_dets);
    }
}

/// Per-pair, per-plane mapping data.
#[derive(Debug, Clone, Copy)]
struct PairPlaneEntry {
    /// Plane of the even module of the pair.
    plane: PlaneId,
    first_channel: u32,
    /// Wires anchored to the frame; channels per pair-plane is twice this.
    anchored: u32,
    wires_per_plane: u32,
    view: View,
    signal: SignalType,
}

/// Channel map for wrapped-wire module pairs.
#[derive(Debug, Default)]
pub struct WrappedChannelMap {
    /// Entries in channel order, one per (enclosure, pair, plane).
    entries: Vec<PairPlaneEntry>,
    /// `entries` index addressed `[enclosure][pair][plane]`.
    pair_index: Vec<Vec<Vec<usize>>>,
    n_channels: u32,
    views: BTreeSet<View>,
    plane_ids: BTreeSet<PlaneId>,
}

impl WrappedChannelMap {
    /// An uninitialized map; [`ChannelMap::initialize`] populates it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wires anchored to the frame: the longest run of strictly
    /// increasing z from the first wire. Vertical-wire planes never wrap.
    fn anchored_wires(plane: &PlaneGeo) -> u32 {
        if plane.view() == View::Z {
            return plane.n_wires();
        }
        let wires = plane.wires();
        for w in 0..wires.len() - 1 {
            if wires[w + 1].center().z <= wires[w].center().z {
                return (w + 1) as u32;
            }
        }
        plane.n_wires()
    }

    fn entry_for_channel(&self, channel: ChannelId) -> Option<&PairPlaneEntry> {
        if channel.0 >= self.n_channels {
            return None;
        }
        let index = self
            .entries
            .partition_point(|entry| entry.first_channel <= channel.0);
        self.entries.get(index.checked_sub(1)?)
    }

    fn entry_for_plane(&self, plane: PlaneId) -> Option<&PairPlaneEntry> {
        if !plane.is_valid() {
            return None;
        }
        let index = *self
            .pair_index
            .get(plane.module.enclosure.enclosure as usize)?
            .get((plane.module.module / 2) as usize)?
            .get(plane.plane as usize)?;
        self.entries.get(index)
    }
}

impl ChannelMap for WrappedChannelMap {
    fn initialize(&mut self, enclosures: &[EnclosureGeo]) -> Result<()> {
        *self = Self::default();

        let mut channel = 0u32;
        for enclosure in enclosures {
            let n_modules = enclosure.n_modules();
            if n_modules == 0 || n_modules % 2 != 0 {
                return Err(ChannelMapError::Unsupported {
                    reason: format!(
                        "wrapped mapping needs paired modules, enclosure {} has {n_modules}",
                        enclosure.id()
                    ),
                }
                .into());
            }

            let modules = enclosure.modules();
            let mut enclosure_index = Vec::with_capacity((n_modules / 2) as usize);
            for pair in 0..n_modules / 2 {
                let even = &modules[(2 * pair) as usize];
                let odd = &modules[(2 * pair + 1) as usize];
                if even.n_planes() != odd.n_planes() {
                    return Err(ChannelMapError::Unsupported {
                        reason: format!(
                            "modules {} and {} of a pair differ in plane count",
                            even.id(),
                            odd.id()
                        ),
                    }
                    .into());
                }

                let mut pair_entries = Vec::with_capacity(even.n_planes() as usize);
                for (p, plane) in even.planes().iter().enumerate() {
                    let plane_id = plane.id();
                    if !plane_id.is_valid() {
                        return Err(ChannelMapError::Unsupported {
                            reason: "element IDs were never assigned".into(),
                        }
                        .into());
                    }
                    let partner = &odd.planes()[p];
                    if partner.n_wires() != plane.n_wires() {
                        return Err(ChannelMapError::Unsupported {
                            reason: format!(
                                "planes {} and {} of a pair differ in wire count",
                                plane_id,
                                partner.id()
                            ),
                        }
                        .into());
                    }

                    let anchored = Self::anchored_wires(plane);
                    let signal = if p as u32 == even.n_planes() - 1 {
                        SignalType::Collection
                    } else {
                        SignalType::Induction
                    };
                    pair_entries.push(self.entries.len());
                    self.entries.push(PairPlaneEntry {
                        plane: plane_id,
                        first_channel: channel,
                        anchored,
                        wires_per_plane: plane.n_wires(),
                        view: plane.view(),
                        signal,
                    });
                    self.views.insert(plane.view());
                    self.plane_ids.insert(plane_id);
                    self.plane_ids.insert(partner.id());
                    channel += 2 * anchored;
                }
                enclosure_index.push(pair_entries);
            }
            self.pair_index.push(enclosure_index);
        }

        if channel == 0 {
            return Err(ChannelMapError::EmptyMap {
                reason: "no wires in any plane".into(),
            }
            .into());
        }
        self.n_channels = channel;
        info!(channels = self.n_channels, "wrapped channel map initialized");
        Ok(())
    }

    fn channel_count(&self) -> u32 {
        self.n_channels
    }

    fn channel_to_wires(&self, channel: ChannelId) -> ChannelWires {
        let Some(entry) = self.entry_for_channel(channel) else {
            return ChannelWires::new();
        };

        let wire_this_plane = channel.0 - entry.first_channel;
        let group = wire_this_plane / entry.anchored;
        let bottom = wire_this_plane - group * entry.anchored;

        // odd winding groups start on the far module of the pair; the
        // winding alternates between the two modules segment by segment
        let even_module = entry.plane.module;
        let odd_module = driftkit_core::ModuleId::in_enclosure(
            even_module.enclosure,
            even_module.module + 1,
        );
        let (here, there) = if group % 2 == 1 {
            (odd_module, even_module)
        } else {
            (even_module, odd_module)
        };

        let mut wires: ChannelWires = SmallVec::new();
        let mut segment = 0u32;
        loop {
            let wire = bottom + segment * entry.anchored;
            let module = if segment % 2 == 0 { here } else { there };
            wires.push(WireId::new(
                module.enclosure.enclosure,
                module.module,
                entry.plane.plane,
                wire,
            ));
            if bottom + (segment + 1) * entry.anchored > entry.wires_per_plane - 1 {
                break;
            }
            segment += 1;
        }
        wires
    }

    fn plane_wire_to_channel(&self, wire: WireId) -> Result<ChannelId> {
        let entry = self
            .entry_for_plane(wire.plane)
            .filter(|entry| wire.wire < entry.wires_per_plane)
            .ok_or(ChannelMapError::UnmappedWire { wire })?;

        let side_offset = (wire.plane.module.module % 2) * entry.anchored;
        let channel = entry.first_channel + (side_offset + wire.wire) % (2 * entry.anchored);
        Ok(ChannelId(channel))
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
