//! ID iteration: every valid combination exactly once, in order,
//! restartable.

use driftkit_core::{EnclosureId, ModuleId, PlaneId, WireId};
use driftkit_geometry::samples::{self, SampleConfig};
use driftkit_geometry::{GeometryConfig, GeometryCore, StandardSorter};

mod common;
use common::CountingMap;

fn small_geometry() -> (SampleConfig, GeometryCore) {
    let config = SampleConfig {
        n_wires: 5,
        ..SampleConfig::default()
    };
    let root = samples::symmetric_detector(&config);
    let mut geometry = GeometryCore::load(&GeometryConfig::default(), &root).unwrap();
    geometry
        .apply_channel_map(&StandardSorter, Box::new(CountingMap::default()))
        .unwrap();
    (config, geometry)
}

#[test]
fn test_enclosure_iteration() {
    let (config, geometry) = small_geometry();
    let ids: Vec<EnclosureId> = geometry.enclosure_ids().collect();
    assert_eq!(ids.len(), config.n_enclosures as usize);
    for (e, id) in ids.iter().enumerate() {
        assert_eq!(*id, EnclosureId::new(e as u32));
        assert!(id.is_valid());
    }
}

#[test]
fn test_module_iteration_carries_into_enclosure() {
    let (config, geometry) = small_geometry();
    let ids: Vec<ModuleId> = geometry.module_ids().collect();
    assert_eq!(ids.len(), (config.n_enclosures * config.n_modules) as usize);

    let expected: Vec<ModuleId> = (0..config.n_enclosures)
        .flat_map(|e| (0..config.n_modules).map(move |m| ModuleId::new(e, m)))
        .collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_plane_iteration_in_id_order() {
    let (config, geometry) = small_geometry();
    let ids: Vec<PlaneId> = geometry.plane_ids().collect();
    assert_eq!(
        ids.len(),
        (config.n_enclosures * config.n_modules * config.n_planes) as usize
    );
    // strictly increasing in the lexicographic ID order
    for pair in ids.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn test_wire_iteration_visits_every_wire_once() {
    let (config, geometry) = small_geometry();
    let ids: Vec<WireId> = geometry.wire_ids().collect();
    let total = config.n_enclosures * config.n_modules * config.n_planes * config.n_wires;
    assert_eq!(ids.len(), total as usize);

    for pair in ids.windows(2) {
        assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
    }

    // least-significant index carries into the parent on overflow
    let boundary = ids
        .iter()
        .position(|id| id.wire == 0 && id.plane.plane == 1)
        .unwrap();
    assert_eq!(ids[boundary - 1].wire, config.n_wires - 1);
    assert_eq!(ids[boundary - 1].plane.plane, 0);
}

#[test]
fn test_iteration_is_restartable() {
    let (_, geometry) = small_geometry();
    let first: Vec<WireId> = geometry.wire_ids().collect();
    let second: Vec<WireId> = geometry.wire_ids().collect();
    assert_eq!(first, second);

    // a partially consumed iterator does not disturb a fresh one
    let mut partial = geometry.wire_ids();
    partial.by_ref().take(7).count();
    let fresh: Vec<WireId> = geometry.wire_ids().collect();
    assert_eq!(fresh, first);
}
