//! The geometry core: owns the element tree and answers queries.

use nalgebra::Point3;
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{debug, info};

use driftkit_core::{
    ChannelId, ChannelMapError, EnclosureId, Error, GeometryError, ModuleId, PlaneId, Result,
    SignalType, View, WireId, WireIntersection,
};

use crate::builder::{GeometryBuilder, DEFAULT_MAX_DEPTH};
use crate::channelmap::{ChannelMap, ChannelWires};
use crate::elements::{AuxDetGeo, EnclosureGeo, ModuleGeo, PlaneGeo, WireGeo};
use crate::intersect;
use crate::iterators::{EnclosureIdIter, ModuleIdIter, PlaneIdIter, WireIdIter};
use crate::node::VolumeNode;
use crate::sorter::GeoObjectSorter;

/// Load-time parameters of the geometry core.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Free-form detector name; stored lower-cased.
    pub detector_name: String,
    /// Relative tolerance added to every bounding-box face in position
    /// lookups.
    pub position_epsilon: f64,
    /// Bound on volume-tree nesting accepted from the loader.
    pub max_depth: usize,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            detector_name: String::new(),
            position_epsilon: 1e-4,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// World bounding boxes of every enclosure and module, in ID order.
///
/// Built lazily on the first position query and cached for the lifetime of
/// the geometry; the reload path replaces the whole `GeometryCore`, so the
/// cache can never outlive the elements it indexes.
#[derive(Debug, Clone)]
struct PositionCache {
    enclosure_bounds: Vec<[f64; 6]>,
    module_bounds: Vec<Vec<[f64; 6]>>,
}

impl PositionCache {
    fn build(enclosures: &[EnclosureGeo]) -> Self {
        Self {
            enclosure_bounds: enclosures.iter().map(|e| *e.bounds()).collect(),
            module_bounds: enclosures
                .iter()
                .map(|e| e.modules().iter().map(|m| *m.bounds()).collect())
                .collect(),
        }
    }
}

/// Access to the description of the detector geometry.
///
/// Owns the sorted element tree, the active channel map, and the cached
/// spatial lookup tables. Building and sorting are single-threaded and
/// rare; every query afterwards is pure and safe for unsynchronized
/// concurrent use. A reload builds a fresh `GeometryCore` and swaps it in
/// whole.
pub struct GeometryCore {
    detector_name: String,
    wiggle: f64,
    enclosures: Vec<EnclosureGeo>,
    aux_dets: Vec<AuxDetGeo>,
    channel_map: Option<Box<dyn ChannelMap>>,
    position_cache: RwLock<Option<PositionCache>>,
}

impl std::fmt::Debug for GeometryCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryCore")
            .field("detector_name", &self.detector_name)
            .field("wiggle", &self.wiggle)
            .field("enclosures", &self.enclosures.len())
            .field("aux_dets", &self.aux_dets.len())
            .field("channel_map", &self.channel_map.is_some())
            .finish()
    }
}

impl GeometryCore {
    /// Build the element tree from a raw volume tree.
    ///
    /// The result is unsorted and without IDs or channel map; call
    /// [`Self::apply_channel_map`] to finish the load.
    pub fn load(config: &GeometryConfig, root: &VolumeNode) -> Result<Self> {
        let builder = GeometryBuilder::with_max_depth(config.max_depth);
        let (enclosures, aux_dets) = builder.build(root)?;

        info!(
            detector = %config.detector_name,
            enclosures = enclosures.len(),
            "new detector geometry loaded"
        );
        Ok(Self {
            detector_name: config.detector_name.to_lowercase(),
            wiggle: 1.0 + config.position_epsilon,
            enclosures,
            aux_dets,
            channel_map: None,
            position_cache: RwLock::new(None),
        })
    }

    /// Sort the tree with the given strategy, assign IDs, and initialize
    /// the channel map.
    ///
    /// The map is built strictly after sorting and ID assignment, exactly
    /// once per load; failure aborts the load and leaves no partially
    /// built map behind.
    pub fn apply_channel_map(
        &mut self,
        sorter: &dyn GeoObjectSorter,
        mut channel_map: Box<dyn ChannelMap>,
    ) -> Result<()> {
        self.sort_geometry(sorter);
        self.update_after_sorting();

        channel_map.initialize(&self.enclosures)?;
        if channel_map.channel_count() == 0 {
            return Err(ChannelMapError::EmptyMap {
                reason: "strategy reported zero channels".into(),
            }
            .into());
        }

        debug!(channels = channel_map.channel_count(), "channel map ready");
        self.channel_map = Some(channel_map);
        *self.position_cache.write() = None;
        Ok(())
    }

    /// Reorder every nesting level with the given strategy.
    fn sort_geometry(&mut self, sorter: &dyn GeoObjectSorter) {
        debug!("sorting volumes");
        sorter.sort_aux_dets(&mut self.aux_dets);
        sorter.sort_enclosures(&mut self.enclosures);
        for enclosure in &mut self.enclosures {
            enclosure.sort_sub_volumes(sorter);
        }
    }

    /// Stamp contiguous 0-based IDs over the sorted tree.
    ///
    /// Idempotent: re-running on an already-sorted tree reproduces the
    /// same IDs.
    fn update_after_sorting(&mut self) {
        for (e, enclosure) in self.enclosures.iter_mut().enumerate() {
            enclosure.update_after_sorting(EnclosureId::new(e as u32));
        }
        for (a, aux_det) in self.aux_dets.iter_mut().enumerate() {
            aux_det.update_after_sorting(a as u32);
        }
    }

    /// The lower-cased detector name.
    pub fn detector_name(&self) -> &str {
        &self.detector_name
    }

    /// The multiplicative bounding-box tolerance in use.
    pub fn wiggle(&self) -> f64 {
        self.wiggle
    }

    // ----- counts ---------------------------------------------------------

    /// Number of enclosures.
    pub fn n_enclosures(&self) -> u32 {
        self.enclosures.len() as u32
    }

    /// Number of modules in an enclosure, 0 if the ID is unknown.
    pub fn n_modules(&self, enclosure: EnclosureId) -> u32 {
        self.enclosure_ptr(enclosure)
            .map_or(0, EnclosureGeo::n_modules)
    }

    /// Number of planes in a module, 0 if the ID is unknown.
    pub fn n_planes(&self, module: ModuleId) -> u32 {
        self.module_ptr(module).map_or(0, ModuleGeo::n_planes)
    }

    /// Number of wires in a plane, 0 if the ID is unknown.
    pub fn n_wires(&self, plane: PlaneId) -> u32 {
        self.plane_ptr(plane).map_or(0, PlaneGeo::n_wires)
    }

    /// Total number of modules over all enclosures.
    pub fn total_modules(&self) -> u32 {
        self.enclosures.iter().map(EnclosureGeo::n_modules).sum()
    }

    /// Largest module count over the enclosures.
    pub fn max_modules(&self) -> u32 {
        self.enclosures
            .iter()
            .map(EnclosureGeo::n_modules)
            .max()
            .unwrap_or(0)
    }

    /// Largest plane count over all modules.
    pub fn max_planes(&self) -> u32 {
        self.enclosures
            .iter()
            .flat_map(|e| e.modules().iter().map(ModuleGeo::n_planes))
            .max()
            .unwrap_or(0)
    }

    /// Largest wire count over all planes.
    pub fn max_wires(&self) -> u32 {
        self.enclosures
            .iter()
            .flat_map(|e| e.modules().iter().map(ModuleGeo::max_wires))
            .max()
            .unwrap_or(0)
    }

    /// Total number of optical detectors.
    pub fn n_op_dets(&self) -> u32 {
        self.enclosures.iter().map(EnclosureGeo::n_op_dets).sum()
    }

    /// Number of auxiliary detectors.
    pub fn n_aux_dets(&self) -> u32 {
        self.aux_dets.len() as u32
    }

    // ----- element lookup -------------------------------------------------

    /// The enclosure with the given ID, if any.
    pub fn enclosure_ptr(&self, id: EnclosureId) -> Option<&EnclosureGeo> {
        if !id.is_valid() {
            return None;
        }
        self.enclosures.get(id.enclosure as usize)
    }

    /// The enclosure with the given ID.
    pub fn enclosure(&self, id: EnclosureId) -> Result<&EnclosureGeo> {
        self.enclosure_ptr(id)
            .ok_or_else(|| Error::not_found(format!("enclosure {id} does not exist")))
    }

    /// The module with the given ID, if any.
    pub fn module_ptr(&self, id: ModuleId) -> Option<&ModuleGeo> {
        self.enclosure_ptr(id.enclosure)?.module(id.module)
    }

    /// The module with the given ID.
    pub fn module(&self, id: ModuleId) -> Result<&ModuleGeo> {
        self.module_ptr(id)
            .ok_or_else(|| Error::not_found(format!("module {id} does not exist")))
    }

    /// The plane with the given ID, if any.
    pub fn plane_ptr(&self, id: PlaneId) -> Option<&PlaneGeo> {
        self.module_ptr(id.module)?.plane(id.plane)
    }

    /// The plane with the given ID.
    pub fn plane(&self, id: PlaneId) -> Result<&PlaneGeo> {
        self.plane_ptr(id)
            .ok_or_else(|| Error::not_found(format!("plane {id} does not exist")))
    }

    /// The wire with the given ID, if any.
    pub fn wire_ptr(&self, id: WireId) -> Option<&WireGeo> {
        self.plane_ptr(id.plane)?.wire(id.wire)
    }

    /// The wire with the given ID.
    pub fn wire(&self, id: WireId) -> Result<&WireGeo> {
        self.wire_ptr(id)
            .ok_or_else(|| Error::not_found(format!("wire {id} does not exist")))
    }

    /// Whether a wire with this ID exists.
    pub fn has_wire(&self, id: WireId) -> bool {
        self.wire_ptr(id).is_some()
    }

    /// The auxiliary detector at the given index.
    pub fn aux_det(&self, index: u32) -> Result<&AuxDetGeo> {
        self.aux_dets
            .get(index as usize)
            .ok_or_else(|| Error::not_found(format!("aux detector #{index} does not exist")))
    }

    /// All enclosures, in ID order.
    pub fn enclosures(&self) -> &[EnclosureGeo] {
        &self.enclosures
    }

    /// All auxiliary detectors, in ID order.
    pub fn aux_dets(&self) -> &[AuxDetGeo] {
        &self.aux_dets
    }

    // ----- dimensions -----------------------------------------------------

    /// Half width of a module's active volume (along the drift axis).
    pub fn module_half_width(&self, id: ModuleId) -> Result<f64> {
        Ok(self.module(id)?.active_half_width())
    }

    /// Half height of a module's active volume.
    pub fn module_half_height(&self, id: ModuleId) -> Result<f64> {
        Ok(self.module(id)?.active_half_height())
    }

    /// Full length of a module's active volume.
    pub fn module_length(&self, id: ModuleId) -> Result<f64> {
        Ok(self.module(id)?.active_length())
    }

    /// Distance between two planes of a module along the drift coordinate.
    pub fn plane_pitch(&self, module: ModuleId, p1: u32, p2: u32) -> Result<f64> {
        let module = self.module(module)?;
        if p1 >= module.n_planes() || p2 >= module.n_planes() {
            return Err(Error::not_found(format!(
                "plane pitch {p1}..{p2} outside module with {} planes",
                module.n_planes()
            )));
        }
        Ok(module.plane_pitch(p1, p2))
    }

    /// Distance between adjacent wires of a plane.
    pub fn wire_pitch(&self, plane: PlaneId) -> Result<f64> {
        Ok(self.plane(plane)?.wire_pitch())
    }

    /// Angle to vertical of the wires with the given view in a module.
    pub fn wire_angle_to_vertical(&self, view: View, module: ModuleId) -> Result<f64> {
        let module_geo = self.module(module)?;
        module_geo
            .planes()
            .iter()
            .find(|plane| plane.view() == view)
            .map(PlaneGeo::theta_z)
            .ok_or_else(|| Error::not_found(format!("no view {view} in module {module}")))
    }

    /// The wire endpoints, canonicalized so the end has the higher z (and,
    /// for vertical wires, the higher y).
    pub fn wire_end_points(&self, id: WireId) -> Result<(Point3<f64>, Point3<f64>)> {
        let wire = self.wire(id)?;
        let (mut start, mut end) = (wire.start(), wire.end());
        if end.z < start.z {
            std::mem::swap(&mut start, &mut end);
        }
        if end.y < start.y && (end.z - start.z).abs() < 0.01 {
            std::mem::swap(&mut start, &mut end);
        }
        Ok((start, end))
    }

    // ----- position queries -----------------------------------------------

    /// Run `f` against the lazily built bounding-box tables.
    fn with_position_cache<T>(&self, f: impl FnOnce(&PositionCache) -> T) -> T {
        {
            let guard = self.position_cache.read();
            if let Some(cache) = guard.as_ref() {
                return f(cache);
            }
        }
        let mut guard = self.position_cache.write();
        let cache = guard.get_or_insert_with(|| PositionCache::build(&self.enclosures));
        f(cache)
    }

    /// The enclosure containing the world position, if any.
    pub fn find_enclosure_at_position(&self, point: &Point3<f64>) -> Option<EnclosureId> {
        let wiggle = self.wiggle;
        self.with_position_cache(|cache| {
            cache
                .enclosure_bounds
                .iter()
                .position(|bounds| crate::elements::bounds_contain(bounds, point, wiggle))
                .map(|e| EnclosureId::new(e as u32))
        })
    }

    /// The module containing the world position, if any.
    pub fn find_module_at_position(&self, point: &Point3<f64>) -> Option<ModuleId> {
        let enclosure = self.find_enclosure_at_position(point)?;
        let wiggle = self.wiggle;
        self.with_position_cache(|cache| {
            cache.module_bounds[enclosure.enclosure as usize]
                .iter()
                .position(|bounds| crate::elements::bounds_contain(bounds, point, wiggle))
                .map(|m| ModuleId::in_enclosure(enclosure, m as u32))
        })
    }

    /// The enclosure containing the world position.
    pub fn position_to_enclosure(&self, point: &Point3<f64>) -> Result<&EnclosureGeo> {
        let id = self.find_enclosure_at_position(point).ok_or_else(|| {
            Error::not_found(format!(
                "no enclosure at position ({}, {}, {})",
                point.x, point.y, point.z
            ))
        })?;
        self.enclosure(id)
    }

    /// The module containing the world position.
    pub fn position_to_module(&self, point: &Point3<f64>) -> Result<&ModuleGeo> {
        let id = self.find_module_at_position(point).ok_or_else(|| {
            Error::not_found(format!(
                "no module at position ({}, {}, {})",
                point.x, point.y, point.z
            ))
        })?;
        self.module(id)
    }

    /// Continuous wire coordinate of a transverse position on a plane.
    pub fn wire_coordinate(&self, y: f64, z: f64, plane: PlaneId) -> Result<f64> {
        Ok(self.plane(plane)?.wire_coordinate(y, z))
    }

    /// The wire of the plane nearest to the world position.
    pub fn nearest_wire_id(&self, point: &Point3<f64>, plane: PlaneId) -> Result<WireId> {
        self.plane(plane)?.nearest_wire_id(point)
    }

    /// The channel reading out the wire nearest to the world position.
    pub fn nearest_channel(&self, point: &Point3<f64>, plane: PlaneId) -> Result<ChannelId> {
        let wire = self.nearest_wire_id(point, plane)?;
        self.plane_wire_to_channel(wire)
    }

    /// Index of the auxiliary detector closest to the world position.
    pub fn nearest_aux_det(&self, point: &Point3<f64>) -> Option<u32> {
        let mut best: Option<(u32, f64)> = None;
        for (a, aux_det) in self.aux_dets.iter().enumerate() {
            let distance = aux_det.distance_to(point);
            match best {
                Some((_, closest)) if closest <= distance => {}
                _ => best = Some((a as u32, distance)),
            }
        }
        best.map(|(a, _)| a)
    }

    /// The optical detector closest to the world position, as
    /// (enclosure, detector index).
    pub fn closest_op_det(&self, point: &Point3<f64>) -> Result<(EnclosureId, u32)> {
        let enclosure = self.position_to_enclosure(point)?;
        let op_det = enclosure.closest_op_det(point).ok_or_else(|| {
            Error::not_found(format!(
                "enclosure {} has no optical detectors",
                enclosure.id()
            ))
        })?;
        Ok((enclosure.id(), op_det))
    }

    // ----- channel map ----------------------------------------------------

    /// The active channel map.
    pub fn channel_map(&self) -> Result<&dyn ChannelMap> {
        self.channel_map
            .as_deref()
            .ok_or_else(|| GeometryError::NoChannelMap.into())
    }

    /// Total number of readout channels.
    pub fn channel_count(&self) -> Result<u32> {
        Ok(self.channel_map()?.channel_count())
    }

    /// Every wire read out by the channel; empty if the channel is
    /// unmapped.
    pub fn channel_to_wires(&self, channel: ChannelId) -> Result<ChannelWires> {
        Ok(self.channel_map()?.channel_to_wires(channel))
    }

    /// The channel reading out the wire.
    pub fn plane_wire_to_channel(&self, wire: WireId) -> Result<ChannelId> {
        self.channel_map()?.plane_wire_to_channel(wire)
    }

    /// Signal classification of the channel.
    pub fn signal_type(&self, channel: ChannelId) -> Result<SignalType> {
        Ok(self.channel_map()?.signal_type(channel))
    }

    /// Orientation classification of the channel.
    pub fn view(&self, channel: ChannelId) -> Result<View> {
        Ok(self.channel_map()?.view(channel))
    }

    /// Signal classification of a plane.
    pub fn plane_signal_type(&self, plane: PlaneId) -> Result<SignalType> {
        Ok(self.channel_map()?.plane_signal_type(plane))
    }

    /// Orientation classification of a plane.
    pub fn plane_view(&self, plane: PlaneId) -> Result<View> {
        Ok(self.channel_map()?.plane_view(plane))
    }

    /// Whether the channel exists.
    pub fn has_channel(&self, channel: ChannelId) -> bool {
        self.channel_map
            .as_deref()
            .is_some_and(|map| map.has_channel(channel))
    }

    // ----- intersections --------------------------------------------------

    /// Validate that two wires are comparable: same module, different
    /// planes, both existing.
    fn wire_intersection_check(&self, a: WireId, b: WireId) -> Result<()> {
        if a.module_id() != b.module_id() {
            return Err(Error::invalid_argument(format!(
                "wires {a} and {b} are in different modules"
            )));
        }
        if a.plane.plane == b.plane.plane {
            return Err(Error::invalid_argument(format!(
                "wires {a} and {b} are in the same plane"
            )));
        }
        for wire in [a, b] {
            if !self.has_wire(wire) {
                return Err(Error::not_found(format!("wire {wire} does not exist")));
            }
        }
        Ok(())
    }

    /// Where two wires of the same module cross, in the shared transverse
    /// (y, z) frame.
    ///
    /// Failure to cross is reported both ways: the boolean is false and
    /// the result carries the sentinel (infinite coordinates, invalid
    /// module for parallel wires; the off-segment crossing point with an
    /// invalid module when the supporting lines cross outside the wires).
    pub fn wire_ids_intersect(&self, a: WireId, b: WireId) -> Result<(bool, WireIntersection)> {
        self.wire_intersection_check(a, b)?;

        let (a_start, a_end) = self.wire_end_points(a)?;
        let (b_start, b_end) = self.wire_end_points(b)?;
        let a_seg = ((a_start.y, a_start.z), (a_end.y, a_end.z));
        let b_seg = ((b_start.y, b_start.z), (b_end.y, b_end.z));

        let Some((y, z)) = intersect::intersect_lines(a_seg.0, a_seg.1, b_seg.0, b_seg.1) else {
            return Ok((false, WireIntersection::missed()));
        };

        let within = intersect::point_within_segments(a_seg.0, a_seg.1, b_seg.0, b_seg.1, (y, z));
        let module = if within {
            a.module_id()
        } else {
            ModuleId::invalid()
        };
        Ok((within, WireIntersection { y, z, module }))
    }

    /// Convenience form of [`Self::wire_ids_intersect`] returning only the
    /// intersection record.
    pub fn intersection_point(&self, a: WireId, b: WireId) -> Result<WireIntersection> {
        Ok(self.wire_ids_intersect(a, b)?.1)
    }

    /// Validate two planes for slope transfer: same module, different
    /// planes.
    fn check_independent_planes(&self, p1: PlaneId, p2: PlaneId) -> Result<()> {
        if p1.module != p2.module {
            return Err(Error::invalid_argument(format!(
                "planes {p1} and {p2} are in different modules"
            )));
        }
        if p1 == p2 {
            return Err(Error::invalid_argument(format!(
                "need two different planes, got {p1} twice"
            )));
        }
        Ok(())
    }

    /// The one plane of a three-plane module that is neither input.
    pub fn third_plane(&self, p1: PlaneId, p2: PlaneId) -> Result<PlaneId> {
        self.check_independent_planes(p1, p2)?;
        let n_planes = self.n_planes(p1.module);
        if n_planes != 3 {
            return Err(Error::invalid_argument(format!(
                "third-plane queries support only three-plane modules, module {} has {n_planes}",
                p1.module
            )));
        }
        let remaining = (0..n_planes)
            .find(|&p| p != p1.plane && p != p2.plane)
            .ok_or_else(|| {
                Error::not_found(format!("no plane in {} besides {p1} and {p2}", p1.module))
            })?;
        Ok(PlaneId::in_module(p1.module, remaining))
    }

    /// Slope on `output` equivalent to the apparent slopes seen on two
    /// other planes of the same module.
    pub fn third_plane_slope_on(
        &self,
        p1: PlaneId,
        slope1: f64,
        p2: PlaneId,
        slope2: f64,
        output: PlaneId,
    ) -> Result<f64> {
        self.check_independent_planes(p1, p2)?;
        Ok(intersect::compute_third_plane_slope(
            self.plane(p1)?.phi_z(),
            slope1,
            self.plane(p2)?.phi_z(),
            slope2,
            self.plane(output)?.phi_z(),
        ))
    }

    /// Slope on the remaining plane of a three-plane module.
    pub fn third_plane_slope(
        &self,
        p1: PlaneId,
        slope1: f64,
        p2: PlaneId,
        slope2: f64,
    ) -> Result<f64> {
        let output = self.third_plane(p1, p2)?;
        self.third_plane_slope_on(p1, slope1, p2, slope2, output)
    }

    /// dT/dW slope on `output`, converting through each plane's pitch.
    pub fn third_plane_slope_rate_on(
        &self,
        p1: PlaneId,
        slope_rate1: f64,
        p2: PlaneId,
        slope_rate2: f64,
        output: PlaneId,
    ) -> Result<f64> {
        self.check_independent_planes(p1, p2)?;
        let (first, second, target) = (self.plane(p1)?, self.plane(p2)?, self.plane(output)?);
        Ok(intersect::compute_third_plane_slope_rate(
            first.phi_z(),
            first.wire_pitch(),
            slope_rate1,
            second.phi_z(),
            second.wire_pitch(),
            slope_rate2,
            target.phi_z(),
            target.wire_pitch(),
        ))
    }

    /// dT/dW slope on the remaining plane of a three-plane module.
    pub fn third_plane_slope_rate(
        &self,
        p1: PlaneId,
        slope_rate1: f64,
        p2: PlaneId,
        slope_rate2: f64,
    ) -> Result<f64> {
        let output = self.third_plane(p1, p2)?;
        self.third_plane_slope_rate_on(p1, slope_rate1, p2, slope_rate2, output)
    }

    // ----- ID iteration ---------------------------------------------------

    /// Iterate over every valid enclosure ID.
    pub fn enclosure_ids(&self) -> EnclosureIdIter<'_> {
        EnclosureIdIter::new(self)
    }

    /// Iterate over every valid module ID.
    pub fn module_ids(&self) -> ModuleIdIter<'_> {
        ModuleIdIter::new(self)
    }

    /// Iterate over every valid plane ID.
    pub fn plane_ids(&self) -> PlaneIdIter<'_> {
        PlaneIdIter::new(self)
    }

    /// Iterate over every valid wire ID.
    pub fn wire_ids(&self) -> WireIdIter<'_> {
        WireIdIter::new(self)
    }
}
