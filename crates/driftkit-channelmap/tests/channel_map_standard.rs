//! The standard strategy against the full-size sample detector.

use driftkit_channelmap::StandardChannelMap;
use driftkit_core::{ChannelId, SignalType, View};
use driftkit_geometry::samples::{self, SampleConfig};
use driftkit_geometry::{ChannelMap, GeometryConfig, GeometryCore, StandardSorter};

fn full_geometry() -> (SampleConfig, GeometryCore) {
    let config = SampleConfig::default(); // 2 x 2 x 3 x 100
    let root = samples::symmetric_detector(&config);
    let mut geometry = GeometryCore::load(&GeometryConfig::default(), &root).unwrap();
    geometry
        .apply_channel_map(&StandardSorter, Box::new(StandardChannelMap::new()))
        .unwrap();
    (config, geometry)
}

#[test]
fn test_roundtrip_for_every_wire() {
    let (_, geometry) = full_geometry();
    for wire in geometry.wire_ids() {
        let channel = geometry.plane_wire_to_channel(wire).unwrap();
        let wires = geometry.channel_to_wires(channel).unwrap();
        assert!(
            wires.contains(&wire),
            "channel {channel} does not map back to {wire}"
        );
        assert_eq!(wires.len(), 1);
    }
}

#[test]
fn test_nearest_channel_at_wire_center() {
    let (config, geometry) = full_geometry();
    for plane in geometry.plane_ids() {
        let wire = geometry
            .wire(driftkit_core::WireId::in_plane(plane, config.n_wires / 2))
            .unwrap();
        let center = wire.center();
        let channel = geometry.nearest_channel(&center, plane).unwrap();
        let wires = geometry.channel_to_wires(channel).unwrap();
        assert!(wires.contains(&wire.id()));
    }
}

#[test]
fn test_views_and_signal_types() {
    let (_, geometry) = full_geometry();
    let map = geometry.channel_map().unwrap();

    // vertical, +30 and -30 degree planes: all three views present
    assert!(map.views().contains(&View::U));
    assert!(map.views().contains(&View::V));
    assert!(map.views().contains(&View::Z));

    for plane in geometry.plane_ids() {
        let expected = if plane.plane == 2 {
            SignalType::Collection
        } else {
            SignalType::Induction
        };
        assert_eq!(map.plane_signal_type(plane), expected);

        // channel classification agrees with the plane classification,
        // through both the map and the geometry facade
        let wire = driftkit_core::WireId::in_plane(plane, 0);
        let channel = map.plane_wire_to_channel(wire).unwrap();
        assert_eq!(map.signal_type(channel), expected);
        assert_eq!(map.view(channel), map.plane_view(plane));
        assert_eq!(geometry.signal_type(channel).unwrap(), expected);
        assert_eq!(geometry.view(channel).unwrap(), geometry.plane_view(plane).unwrap());
    }
}

#[test]
fn test_plane_ids_cover_the_detector() {
    let (config, geometry) = full_geometry();
    let map = geometry.channel_map().unwrap();
    assert_eq!(
        map.plane_ids().len(),
        (config.n_enclosures * config.n_modules * config.n_planes) as usize
    );
    for plane in geometry.plane_ids() {
        assert!(map.plane_ids().contains(&plane));
    }
}

#[test]
fn test_out_of_range_channel_is_clean_absence() {
    let (_, geometry) = full_geometry();
    let map = geometry.channel_map().unwrap();
    let beyond = ChannelId(map.channel_count() + 17);
    assert!(map.channel_to_wires(beyond).is_empty());
    assert!(!map.has_channel(beyond));
    assert_eq!(map.signal_type(beyond), SignalType::Unknown);
    assert_eq!(map.view(beyond), View::Unknown);
}

#[test]
fn test_queries_before_map_application_fail_cleanly() {
    let root = samples::symmetric_detector(&SampleConfig::default());
    let geometry = GeometryCore::load(&GeometryConfig::default(), &root).unwrap();
    let err = geometry.channel_count().unwrap_err();
    assert!(matches!(
        err,
        driftkit_core::Error::Geometry(driftkit_core::GeometryError::NoChannelMap)
    ));
}
