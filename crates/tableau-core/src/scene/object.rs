use super::shape::Shape;
use crate::animation::{AnimatedProperty, AnimationTimeline};
use crate::node::DrawNode;
use crate::style::Style;
use crate::types::{Anchor, NodeId, Vector2};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Which part of a scene node's derived state a change affects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Invalidation {
    /// Position, rotation, scale, alpha, z index, visibility, anchor, origin.
    Transform,
    /// Size, style, content and children.
    Object,
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct DirtyFlags {
    pub(crate) transform: bool,
    pub(crate) object: bool,
    pub(crate) content: bool,
}

/// Children and aggregated child status of a container node.
#[derive(Debug, Default)]
pub struct ContainerState {
    pub(crate) children: Vec<NodeId>,
    pub(crate) clip: bool,
    pub(crate) children_timed: bool,
    pub(crate) children_animated: bool,
    pub(crate) children_perfectly_optimized: bool,
}

impl ContainerState {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn clip(&self) -> bool {
        self.clip
    }

    pub fn children_timed(&self) -> bool {
        self.children_timed
    }

    pub fn children_animated(&self) -> bool {
        self.children_animated
    }

    pub fn children_perfectly_optimized(&self) -> bool {
        self.children_perfectly_optimized
    }
}

/// What a scene node draws.
#[derive(Debug)]
pub enum NodeKind {
    /// No content of its own.
    Plain,
    Container(ContainerState),
    Shape(Box<dyn Shape>),
}

impl NodeKind {
    pub fn container() -> Self {
        NodeKind::Container(ContainerState {
            children_perfectly_optimized: true,
            ..ContainerState::default()
        })
    }

    pub fn shape(shape: impl Shape + 'static) -> Self {
        NodeKind::Shape(Box::new(shape))
    }
}

/// Construction options for a scene node.
///
/// `scale` seeds both axes unless `scale_x` / `scale_y` are given. Anchors
/// and origins accept a name (`"centre"`) or a point (`{"x": .5, "y": 0}`)
/// when deserialized; styles accept a hex color or a gradient.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ObjectOptions {
    pub x: f32,
    pub y: f32,
    /// Radians.
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub scale_x: Option<f32>,
    pub scale_y: Option<f32>,
    pub alpha: f32,
    #[serde(deserialize_with = "crate::types::deserialize_anchor")]
    pub anchor: Vector2,
    #[serde(deserialize_with = "crate::types::deserialize_anchor")]
    pub origin: Vector2,
    pub z_index: i32,
    pub visible: bool,
    pub show_bounds: bool,
    pub timed: bool,
    /// Containers only.
    pub clip: bool,
    #[serde(deserialize_with = "crate::schema::deserialize_style")]
    pub fill: Option<Style>,
    #[serde(deserialize_with = "crate::schema::deserialize_style")]
    pub stroke: Option<Style>,
    pub line_width: f32,
}

impl Default for ObjectOptions {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            width: 0.0,
            height: 0.0,
            scale: 1.0,
            scale_x: None,
            scale_y: None,
            alpha: 1.0,
            anchor: Anchor::TOP_LEFT,
            origin: Anchor::TOP_LEFT,
            z_index: 0,
            visible: true,
            show_bounds: false,
            timed: true,
            clip: false,
            fill: None,
            stroke: None,
            line_width: 1.0,
        }
    }
}

#[derive(Debug)]
pub(crate) struct SnapshotCache {
    /// `None` when the snapshot does not depend on time.
    pub(crate) time: Option<f64>,
    pub(crate) node: Arc<dyn DrawNode>,
}

/// A mutable scene node.
///
/// Read access goes through the getters here; mutation goes through
/// `SceneGraph::node_mut`, which keeps dirty bits and parents in sync.
#[derive(Debug)]
pub struct DrawObject {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) rotation: f32,
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) scale_x: f32,
    pub(crate) scale_y: f32,
    pub(crate) alpha: f32,
    pub(crate) anchor: Vector2,
    pub(crate) origin: Vector2,
    pub(crate) z_index: i32,
    pub(crate) visible: bool,
    pub(crate) show_bounds: bool,
    pub(crate) fill: Option<Style>,
    pub(crate) stroke: Option<Style>,
    pub(crate) line_width: f32,
    pub(crate) timed: bool,
    pub(crate) origin_offset: (f32, f32),
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
    pub(crate) animations: BTreeMap<AnimatedProperty, AnimationTimeline<f64>>,
    pub(crate) flags: DirtyFlags,
    pub(crate) cache: Option<SnapshotCache>,
}

impl DrawObject {
    pub(crate) fn new(options: ObjectOptions, mut kind: NodeKind) -> Self {
        if let NodeKind::Container(state) = &mut kind {
            state.clip = options.clip;
        }
        let mut object = Self {
            x: options.x,
            y: options.y,
            rotation: options.rotation,
            width: options.width,
            height: options.height,
            scale_x: options.scale_x.unwrap_or(options.scale),
            scale_y: options.scale_y.unwrap_or(options.scale),
            alpha: options.alpha,
            anchor: options.anchor.freeze(),
            origin: options.origin.freeze(),
            z_index: options.z_index,
            visible: options.visible,
            show_bounds: options.show_bounds,
            fill: options.fill,
            stroke: options.stroke,
            line_width: options.line_width,
            timed: options.timed,
            origin_offset: (0.0, 0.0),
            parent: None,
            kind,
            animations: BTreeMap::new(),
            flags: DirtyFlags {
                transform: true,
                object: true,
                content: true,
            },
            cache: None,
        };
        object.recompute_origin_offset();
        object
    }

    pub(crate) fn recompute_origin_offset(&mut self) {
        self.origin_offset = (
            self.width * self.origin.x() * self.scale_x,
            self.height * self.origin.y() * self.scale_y,
        );
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f32 {
        self.scale_y
    }

    /// Mean of both scale axes.
    pub fn scale(&self) -> f32 {
        (self.scale_x + self.scale_y) / 2.0
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn anchor(&self) -> Vector2 {
        self.anchor
    }

    pub fn origin(&self) -> Vector2 {
        self.origin
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn show_bounds(&self) -> bool {
        self.show_bounds
    }

    pub fn fill(&self) -> Option<&Style> {
        self.fill.as_ref()
    }

    pub fn stroke(&self) -> Option<&Style> {
        self.stroke.as_ref()
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// `(width * origin.x * scale_x, height * origin.y * scale_y)`.
    pub fn origin_offset(&self) -> (f32, f32) {
        self.origin_offset
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn container(&self) -> Option<&ContainerState> {
        match &self.kind {
            NodeKind::Container(state) => Some(state),
            _ => None,
        }
    }

    /// Children in insertion order; empty for non-containers.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Container(state) => state.children.as_slice(),
            _ => &[],
        }
    }

    pub fn radius(&self) -> Option<f32> {
        match &self.kind {
            NodeKind::Shape(shape) if shape.has_radius() => Some(self.width / 2.0),
            _ => None,
        }
    }

    /// The `timed` flag given at construction or by `set_timed`.
    pub fn declared_timed(&self) -> bool {
        self.timed
    }

    /// Whether the snapshot must be re-evaluated when only time moves.
    ///
    /// A container is timed when it is declared timed and some child is
    /// timed, or when anything below it is animated.
    pub fn is_timed(&self) -> bool {
        let animated = !self.animations.is_empty();
        match &self.kind {
            NodeKind::Plain => self.timed || animated,
            NodeKind::Shape(shape) => (self.timed && shape.timed()) || animated,
            NodeKind::Container(state) => {
                (self.timed && state.children_timed) || state.children_animated || animated
            }
        }
    }

    /// Whether this node or anything below it has timelines.
    pub fn is_animated(&self) -> bool {
        !self.animations.is_empty()
            || self.container().is_some_and(|c| c.children_animated)
    }

    pub fn perfectly_optimized(&self) -> bool {
        match &self.kind {
            NodeKind::Plain => true,
            NodeKind::Shape(shape) => shape.perfectly_optimized(),
            NodeKind::Container(state) => state.children_perfectly_optimized,
        }
    }

    pub fn has_animations(&self) -> bool {
        !self.animations.is_empty()
    }

    pub fn transform_changed(&self) -> bool {
        self.flags.transform || !self.perfectly_optimized()
    }

    pub fn object_changed(&self) -> bool {
        self.flags.object || !self.perfectly_optimized()
    }

    /// Set by every invalidation until cleared by the consumer.
    pub fn content_changed(&self) -> bool {
        self.flags.content || !self.perfectly_optimized()
    }

    /// The most recent snapshot, if any.
    pub fn cached_snapshot(&self) -> Option<&Arc<dyn DrawNode>> {
        self.cache.as_ref().map(|c| &c.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::shape::{Circle, Rectangle};

    #[test]
    fn scale_option_seeds_both_axes() {
        let object = DrawObject::new(
            ObjectOptions {
                scale: 2.0,
                scale_y: Some(3.0),
                ..Default::default()
            },
            NodeKind::Plain,
        );
        assert_eq!(object.scale_x(), 2.0);
        assert_eq!(object.scale_y(), 3.0);
        assert_eq!(object.scale(), 2.5);
    }

    #[test]
    fn origin_offset_uses_size_and_scale() {
        let object = DrawObject::new(
            ObjectOptions {
                width: 100.0,
                height: 40.0,
                scale: 2.0,
                origin: Anchor::CENTRE,
                ..Default::default()
            },
            NodeKind::Plain,
        );
        assert_eq!(object.origin_offset(), (100.0, 40.0));
        assert!(object.origin().is_frozen());
    }

    #[test]
    fn built_in_shapes_are_timeless() {
        let rect = DrawObject::new(ObjectOptions::default(), NodeKind::shape(Rectangle));
        assert!(rect.declared_timed());
        assert!(!rect.is_timed());
        assert!(rect.perfectly_optimized());

        let circle = DrawObject::new(
            ObjectOptions {
                width: 8.0,
                ..Default::default()
            },
            NodeKind::shape(Circle),
        );
        assert_eq!(circle.radius(), Some(4.0));
        assert_eq!(rect.radius(), None);
    }

    #[test]
    fn empty_container_is_not_timed() {
        let container = DrawObject::new(ObjectOptions::default(), NodeKind::container());
        assert!(!container.is_timed());
        assert!(container.perfectly_optimized());
        assert!(container.children().is_empty());
    }
}
