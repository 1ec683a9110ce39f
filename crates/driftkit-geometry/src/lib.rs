//! # DriftKit Geometry
//!
//! Element tree, canonical sorting, hierarchical ID assignment, and the
//! spatial query engine for segmented wire-chamber detectors.
//!
//! The pipeline is: an external loader supplies a raw [`node::VolumeNode`]
//! tree; [`builder::GeometryBuilder`] materializes typed elements;
//! [`geometry::GeometryCore::apply_channel_map`] sorts them with a
//! [`sorter::GeoObjectSorter`] strategy, stamps IDs, and initializes a
//! [`channelmap::ChannelMap`] strategy. Every query afterwards is pure and
//! safe for concurrent use.

pub mod builder;
pub mod channelmap;
pub mod elements;
pub mod geometry;
pub mod intersect;
pub mod iterators;
pub mod node;
pub mod samples;
pub mod sorter;
pub mod transform;

pub use builder::{GeometryBuilder, DEFAULT_MAX_DEPTH};
pub use channelmap::{ChannelMap, ChannelWires};
pub use elements::{AuxDetGeo, EnclosureGeo, ModuleGeo, OpDetGeo, PlaneGeo, WireGeo};
pub use geometry::{GeometryConfig, GeometryCore};
pub use intersect::{
    compute_third_plane_slope, compute_third_plane_slope_rate, intersect_lines,
    intersect_segments,
};
pub use node::{BoxDims, VolumeNode};
pub use sorter::{GeoObjectSorter, StandardSorter};
pub use transform::LocalTransform;
