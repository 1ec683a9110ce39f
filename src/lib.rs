//! # DriftKit
//!
//! Geometry indexing and channel mapping for segmented wire-chamber
//! detectors. Given an unordered hierarchical description of physical
//! volumes, DriftKit imposes a canonical order on every nesting level,
//! assigns compact hierarchical IDs, builds a pluggable wire-to-channel
//! mapping, and answers the spatial queries reconstruction code runs
//! millions of times per event: point containment, nearest wire and
//! channel, wire-pair intersection, and cross-plane slope transfer.
//!
//! ## Architecture
//!
//! DriftKit is organized as a workspace with multiple crates:
//!
//! 1. **driftkit-core** - identifier types, classifications, errors
//! 2. **driftkit-geometry** - element tree, builder, sorter, query engine
//! 3. **driftkit-channelmap** - concrete channel mapping strategies
//! 4. **driftkit** - facade that re-exports the public surface

pub use driftkit_core::{
    ChannelId, ChannelMapError, DriftDirection, EnclosureId, Error, GeometryError, ModuleId,
    PlaneId, Result, SignalType, View, WireId, WireIntersection, INVALID_INDEX,
};

pub use driftkit_geometry::{
    compute_third_plane_slope, compute_third_plane_slope_rate, intersect_lines,
    intersect_segments, samples, AuxDetGeo, BoxDims, ChannelMap, ChannelWires, EnclosureGeo,
    GeoObjectSorter, GeometryBuilder, GeometryConfig, GeometryCore, LocalTransform, ModuleGeo,
    OpDetGeo, PlaneGeo, StandardSorter, VolumeNode, WireGeo, DEFAULT_MAX_DEPTH,
};

pub use driftkit_channelmap::{StandardChannelMap, WrappedChannelMap, WrappedSorter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with console output and `RUST_LOG`
/// environment variable support.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
