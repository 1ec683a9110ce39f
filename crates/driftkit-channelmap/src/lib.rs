//! # DriftKit Channel Maps
//!
//! Concrete wire-to-channel mapping strategies:
//!
//! - [`StandardChannelMap`] - one channel per wire, contiguous in ID
//!   order; pairs with the standard sorter.
//! - [`WrappedChannelMap`] - wrapped-wire module pairs where one channel
//!   reads several wire segments; pairs with [`WrappedSorter`].
//!
//! Strategies implement [`driftkit_geometry::ChannelMap`] and are handed
//! to [`driftkit_geometry::GeometryCore::apply_channel_map`] as trait
//! objects.

pub mod standard;
pub mod wrapped;

pub use standard::StandardChannelMap;
pub use wrapped::{WrappedChannelMap, WrappedSorter};
