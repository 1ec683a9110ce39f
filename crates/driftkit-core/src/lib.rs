//! # DriftKit Core
//!
//! Core types shared by every DriftKit crate: hierarchical element
//! identifiers, plane/channel classifications, and the error taxonomy.

pub mod error;
pub mod ids;
pub mod types;

pub use error::{ChannelMapError, Error, GeometryError, Result};
pub use ids::{ChannelId, EnclosureId, ModuleId, PlaneId, WireId, INVALID_INDEX};
pub use types::{DriftDirection, SignalType, View, WireIntersection};
