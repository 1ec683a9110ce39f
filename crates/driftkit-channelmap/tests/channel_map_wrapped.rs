//! The wrapped strategy: channels that aggregate wire segments across a
//! module pair.

use driftkit_channelmap::{WrappedChannelMap, WrappedSorter};
use driftkit_core::{ChannelId, SignalType, View};
use driftkit_geometry::samples::{self, SampleConfig};
use driftkit_geometry::{ChannelMap, GeometryConfig, GeometryCore};

mod common;

const K: u32 = 4;

fn wrapped_geometry() -> GeometryCore {
    let root = common::wrapped_detector(K, 0.5);
    let mut geometry = GeometryCore::load(&GeometryConfig::default(), &root).unwrap();
    geometry
        .apply_channel_map(&WrappedSorter, Box::new(WrappedChannelMap::new()))
        .unwrap();
    geometry
}

#[test]
fn test_channel_count() {
    let geometry = wrapped_geometry();
    // per pair: U and V planes wrap (2K anchored channels each), the
    // collection plane reads K wires per module
    assert_eq!(geometry.channel_count().unwrap(), 6 * K);
}

#[test]
fn test_induction_channels_aggregate_two_segments() {
    let geometry = wrapped_geometry();
    let map = geometry.channel_map().unwrap();

    for channel in 0..4 * K {
        let wires = map.channel_to_wires(ChannelId(channel));
        assert_eq!(
            wires.len(),
            2,
            "induction channel {channel} should read a segment in each module"
        );
        // one segment per module of the pair
        let modules: Vec<u32> = wires.iter().map(|w| w.plane.module.module).collect();
        assert!(modules.contains(&0));
        assert!(modules.contains(&1));
        // every aggregated wire exists in the geometry
        for wire in &wires {
            assert!(geometry.has_wire(*wire), "{wire} missing from geometry");
        }
    }
}

#[test]
fn test_collection_channels_are_one_to_one() {
    let geometry = wrapped_geometry();
    let map = geometry.channel_map().unwrap();
    for channel in 4 * K..6 * K {
        let wires = map.channel_to_wires(ChannelId(channel));
        assert_eq!(wires.len(), 1, "collection channel {channel}");
    }
}

#[test]
fn test_roundtrip_for_every_wire() {
    let geometry = wrapped_geometry();
    for wire in geometry.wire_ids() {
        let channel = geometry.plane_wire_to_channel(wire).unwrap();
        let wires = geometry.channel_to_wires(channel).unwrap();
        assert!(
            wires.contains(&wire),
            "channel {channel} does not map back to {wire}"
        );
    }
}

#[test]
fn test_wires_of_one_channel_share_it() {
    let geometry = wrapped_geometry();
    let map = geometry.channel_map().unwrap();
    for channel in 0..map.channel_count() {
        for wire in map.channel_to_wires(ChannelId(channel)) {
            assert_eq!(map.plane_wire_to_channel(wire).unwrap(), ChannelId(channel));
        }
    }
}

#[test]
fn test_classifications() {
    let geometry = wrapped_geometry();
    let map = geometry.channel_map().unwrap();

    assert_eq!(map.signal_type(ChannelId(0)), SignalType::Induction);
    assert_eq!(
        map.signal_type(ChannelId(4 * K + 1)),
        SignalType::Collection
    );
    assert_eq!(map.view(ChannelId(0)), View::U);
    assert_eq!(map.view(ChannelId(2 * K)), View::V);
    assert_eq!(map.view(ChannelId(4 * K)), View::Z);

    // both modules of the pair are covered by the plane set
    assert_eq!(map.plane_ids().len(), 6);
}

#[test]
fn test_unpaired_modules_are_unsupported() {
    let config = SampleConfig {
        n_modules: 1,
        n_wires: 8,
        ..SampleConfig::default()
    };
    let root = samples::symmetric_detector(&config);
    let mut geometry = GeometryCore::load(&GeometryConfig::default(), &root).unwrap();
    let err = geometry
        .apply_channel_map(&WrappedSorter, Box::new(WrappedChannelMap::new()))
        .unwrap_err();
    assert!(err.is_channel_map_error());
    assert!(err.to_string().contains("paired"));
}

#[test]
fn test_unwrapped_geometry_degrades_to_one_to_one() {
    // a sample whose wire order stays strictly monotone in z under the
    // wrapped sorter never wraps, so every channel reads one wire
    let config = SampleConfig {
        n_wires: 8,
        plane_angles: vec![0.0, 30f64.to_radians(), 60f64.to_radians()],
        ..SampleConfig::default()
    };
    let root = samples::symmetric_detector(&config);
    let mut geometry = GeometryCore::load(&GeometryConfig::default(), &root).unwrap();
    geometry
        .apply_channel_map(&WrappedSorter, Box::new(WrappedChannelMap::new()))
        .unwrap();

    let map = geometry.channel_map().unwrap();
    for channel in 0..map.channel_count() {
        assert_eq!(map.channel_to_wires(ChannelId(channel)).len(), 1);
    }
    for wire in geometry.wire_ids() {
        let channel = map.plane_wire_to_channel(wire).unwrap();
        assert!(map.channel_to_wires(channel).contains(&wire));
    }
}
