//! Error types for the scene graph and timelines.

use crate::types::NodeId;
use thiserror::Error;

/// Result type for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;

/// Errors raised by the scene graph, snapshot nodes and timelines.
///
/// Missing visual resources (an unresolvable gradient, a non-finite animated
/// value) are not errors: they are skipped and logged so a frame still
/// renders.
#[derive(Error, Debug)]
pub enum SceneError {
    /// An abstract snapshot operation was not provided by a concrete kind.
    #[error("{type_name}::{method} is not implemented")]
    NotImplemented {
        type_name: &'static str,
        method: &'static str,
    },

    /// A caller passed a value outside the accepted domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The node id does not refer to a live node.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// The node exists but cannot hold children.
    #[error("node {0} is not a container")]
    NotAContainer(NodeId),

    /// Attaching `child` under `parent` would create a cycle.
    #[error("adding node {child} under node {parent} would create a cycle")]
    HierarchyCycle { parent: NodeId, child: NodeId },

    /// The raster surface could not be allocated.
    #[error("failed to allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },

    /// The surface could not be encoded or written.
    #[error("failed to encode surface: {0}")]
    Encode(String),

    /// A scene description could not be turned into a scene graph.
    #[error("invalid scene description: {0}")]
    Description(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SceneError {
    /// Returns `true` for errors that signal a bug in the calling code rather
    /// than bad input.
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            Self::NotImplemented { .. } | Self::NodeNotFound(_) | Self::NotAContainer(_)
        )
    }
}
