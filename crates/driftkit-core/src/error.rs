//! Error handling for DriftKit
//!
//! Provides error types for the two layers of the engine:
//! - Geometry errors (tree construction, element lookup, spatial queries)
//! - Channel map errors (strategy initialization, wire/channel mapping)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::ids::{ChannelId, PlaneId, WireId};

/// Geometry error type
///
/// Represents errors raised while building the element tree or answering
/// spatial queries against it.
#[derive(Error, Debug, Clone)]
pub enum GeometryError {
    /// No element, channel, or intersection exists at the requested input
    #[error("Not found: {context}")]
    NotFound {
        /// What was looked up and with which input.
        context: String,
    },

    /// The two wires cannot be compared (different module or same plane)
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Why the inputs are not comparable.
        reason: String,
    },

    /// Recursion passed the maximum allowed node depth
    #[error("Exceeded maximum node depth {max_depth} while descending volume tree")]
    DepthExceeded {
        /// The depth at which descent was abandoned.
        depth: usize,
        /// The configured depth bound.
        max_depth: usize,
    },

    /// No channel map was ever successfully initialized for this geometry
    #[error("No channel map has been initialized")]
    NoChannelMap,

    /// A computed wire coordinate fell outside the plane's valid range
    ///
    /// Carries both the raw out-of-range index and the nearest valid one,
    /// so callers may clamp instead of failing.
    #[error("Wire index {raw} is outside plane {plane} (nearest valid wire is {clamped})")]
    InvalidWireIndex {
        /// The plane the coordinate was computed on.
        plane: PlaneId,
        /// The raw, out-of-range wire index.
        raw: i64,
        /// The in-range index closest to the raw one.
        clamped: u32,
    },
}

/// Channel map error type
///
/// Represents failures of a channel mapping strategy, either while it is
/// being initialized or while resolving a wire/channel.
#[derive(Error, Debug, Clone)]
pub enum ChannelMapError {
    /// The strategy was queried before `initialize` succeeded
    #[error("Channel map queried before initialization")]
    Uninitialized,

    /// `initialize` produced no usable mapping
    #[error("Channel map initialization produced no channels: {reason}")]
    EmptyMap {
        /// Why no channel was mapped.
        reason: String,
    },

    /// The detector topology is outside what this strategy supports
    #[error("Unsupported topology for this channel map: {reason}")]
    Unsupported {
        /// What the strategy found incompatible.
        reason: String,
    },

    /// The wire is not covered by the mapping
    #[error("Wire {wire} is not mapped to any channel")]
    UnmappedWire {
        /// The wire that has no channel.
        wire: WireId,
    },

    /// The channel is not covered by the mapping
    #[error("Channel {channel} is not mapped")]
    UnmappedChannel {
        /// The channel that has no wires.
        channel: ChannelId,
    },
}

/// Main error type for DriftKit
///
/// A unified error type that can represent any error from both layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Channel map error
    #[error(transparent)]
    ChannelMap(#[from] ChannelMapError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Shorthand for a [`GeometryError::NotFound`]
    pub fn not_found(context: impl Into<String>) -> Self {
        GeometryError::NotFound {
            context: context.into(),
        }
        .into()
    }

    /// Shorthand for a [`GeometryError::InvalidArgument`]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        GeometryError::InvalidArgument {
            reason: reason.into(),
        }
        .into()
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Geometry(GeometryError::NotFound { .. }))
    }

    /// Check if this is an out-of-range wire index error
    pub fn is_invalid_wire_index(&self) -> bool {
        matches!(self, Error::Geometry(GeometryError::InvalidWireIndex { .. }))
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is a channel map error
    pub fn is_channel_map_error(&self) -> bool {
        matches!(self, Error::ChannelMap(_))
    }

    /// The clamped wire index carried by an [`GeometryError::InvalidWireIndex`],
    /// letting callers recover the nearest valid wire instead of failing
    pub fn suggested_wire(&self) -> Option<u32> {
        match self {
            Error::Geometry(GeometryError::InvalidWireIndex { clamped, .. }) => Some(*clamped),
            _ => None,
        }
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::PlaneId;

    #[test]
    fn test_invalid_wire_index_carries_both_indices() {
        let err: Error = GeometryError::InvalidWireIndex {
            plane: PlaneId::new(0, 1, 2),
            raw: -3,
            clamped: 0,
        }
        .into();

        assert!(err.is_invalid_wire_index());
        assert_eq!(err.suggested_wire(), Some(0));
        let text = err.to_string();
        assert!(text.contains("-3"));
        assert!(text.contains("E:0 M:1 P:2"));
    }

    #[test]
    fn test_not_found_predicate() {
        let err = Error::not_found("module at (0, 0, 0)");
        assert!(err.is_not_found());
        assert!(err.is_geometry_error());
        assert!(!err.is_channel_map_error());
    }
}
