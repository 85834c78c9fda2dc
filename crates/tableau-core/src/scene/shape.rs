use crate::error::Result;
use crate::node::{CircleNode, DrawNode, NodeOptions, RectangleNode};
use std::fmt;
use std::sync::Arc;

/// The drawable content of a leaf scene node.
///
/// A shape turns resolved `NodeOptions` into a snapshot node. Shapes that
/// keep state of their own which the scene graph cannot see must stay
/// *not* perfectly optimized, so their snapshots are rebuilt on every
/// request instead of served from a possibly stale cache.
pub trait Shape: fmt::Debug {
    fn type_name(&self) -> &'static str;

    /// Whether the shape changes with elapsed time alone. A scene node is
    /// timed only if both the node and its shape say so.
    fn timed(&self) -> bool {
        true
    }

    /// `true` only when every influence on the snapshot goes through the
    /// scene node's setters.
    fn perfectly_optimized(&self) -> bool {
        false
    }

    /// Whether the shape derives a radius from its width.
    fn has_radius(&self) -> bool {
        false
    }

    fn create(&self, options: NodeOptions) -> Result<Arc<dyn DrawNode>>;

    /// Builds the next snapshot, reusing `previous` when there is one.
    fn snapshot(
        &self,
        options: NodeOptions,
        previous: Option<&Arc<dyn DrawNode>>,
    ) -> Result<Arc<dyn DrawNode>> {
        match previous {
            Some(previous) => previous.with(options),
            None => self.create(options),
        }
    }
}

/// A filled and stroked rectangle covering the node bounds.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rectangle;

impl Shape for Rectangle {
    fn type_name(&self) -> &'static str {
        "Rectangle"
    }

    fn timed(&self) -> bool {
        false
    }

    fn perfectly_optimized(&self) -> bool {
        true
    }

    fn create(&self, options: NodeOptions) -> Result<Arc<dyn DrawNode>> {
        Ok(Arc::new(RectangleNode::new(options)))
    }
}

/// A circle with radius `width / 2`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Circle;

impl Shape for Circle {
    fn type_name(&self) -> &'static str {
        "Circle"
    }

    fn timed(&self) -> bool {
        false
    }

    fn perfectly_optimized(&self) -> bool {
        true
    }

    fn has_radius(&self) -> bool {
        true
    }

    fn create(&self, options: NodeOptions) -> Result<Arc<dyn DrawNode>> {
        Ok(Arc::new(CircleNode::new(options)))
    }
}
