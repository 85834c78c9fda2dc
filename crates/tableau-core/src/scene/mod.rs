//! # Scene Graph Module
//!
//! Arena-based storage for the mutable scene tree and the snapshot pipeline
//! built on top of it.
//!
//! ## Responsibilities
//! - **Node Storage**: `Vec<Option<DrawObject>>` arena with `NodeId` indices.
//! - **Hierarchy**: containers own their child lists; a child keeps only the
//!   id of its parent. Adding a child to a new container detaches it from
//!   the old one, and cycles are rejected.
//! - **Invalidation**: setters raise `Transform` or `Object` dirty bits and
//!   every change walks the parent chain once, refreshing container
//!   aggregates on the way up.
//! - **Snapshots**: `get_snapshot` resolves timelines, rebuilds only the
//!   dirty parts of a node and caches the result per timeline position.
//!
//! ## Key Types
//! - `SceneGraph`: the arena.
//! - `DrawObject`: one scene node.
//! - `NodeMut`: setter handle returned by `SceneGraph::node_mut`.

mod handle;
mod object;
mod shape;

pub use handle::NodeMut;
pub use object::{ContainerState, DrawObject, Invalidation, NodeKind, ObjectOptions};
pub use shape::{Circle, Rectangle, Shape};

use crate::animation::{AnimatedProperty, AnimationTimeline};
use crate::error::{Result, SceneError};
use crate::node::{ContainerNode, DrawNode, NodeOptions, NodeTransform, PlainNode};
use crate::style::Style;
use crate::types::NodeId;
use object::SnapshotCache;
use std::sync::Arc;
use tracing::{debug, trace};

/// The scene tree.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Option<DrawObject>>,
    free_indices: Vec<usize>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds a detached node and returns its id.
    pub fn add_object(&mut self, options: ObjectOptions, kind: NodeKind) -> NodeId {
        let object = DrawObject::new(options, kind);
        if let Some(id) = self.free_indices.pop() {
            self.nodes[id] = Some(object);
            id
        } else {
            self.nodes.push(Some(object));
            self.nodes.len() - 1
        }
    }

    pub fn add_plain(&mut self, options: ObjectOptions) -> NodeId {
        self.add_object(options, NodeKind::Plain)
    }

    pub fn add_container(&mut self, options: ObjectOptions) -> NodeId {
        self.add_object(options, NodeKind::container())
    }

    pub fn add_rectangle(&mut self, options: ObjectOptions) -> NodeId {
        self.add_object(options, NodeKind::shape(Rectangle))
    }

    pub fn add_circle(&mut self, options: ObjectOptions) -> NodeId {
        self.add_object(options, NodeKind::shape(Circle))
    }

    pub fn add_shape(&mut self, options: ObjectOptions, shape: impl Shape + 'static) -> NodeId {
        self.add_object(options, NodeKind::shape(shape))
    }

    pub fn node(&self, id: NodeId) -> Result<&DrawObject> {
        self.slot(id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Returns a setter handle for the node.
    pub fn node_mut(&mut self, id: NodeId) -> Result<NodeMut<'_>> {
        self.node(id)?;
        Ok(NodeMut::new(self, id))
    }

    pub(crate) fn slot(&self, id: NodeId) -> Option<&DrawObject> {
        self.nodes.get(id).and_then(|n| n.as_ref())
    }

    pub(crate) fn slot_mut(&mut self, id: NodeId) -> Option<&mut DrawObject> {
        self.nodes.get_mut(id).and_then(|n| n.as_mut())
    }

    fn object_mut(&mut self, id: NodeId) -> Result<&mut DrawObject> {
        self.slot_mut(id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Appends `child` to the container `parent`.
    ///
    /// No-op if the child is already there. A child owned by another
    /// container is detached from it first.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if parent == child {
            return Err(SceneError::HierarchyCycle { parent, child });
        }
        let container = self.node(parent)?.container().ok_or(SceneError::NotAContainer(parent))?;
        if container.children.contains(&child) {
            return Ok(());
        }
        let old_parent = self.node(child)?.parent;

        // `child` must not be an ancestor of `parent`.
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == child {
                return Err(SceneError::HierarchyCycle { parent, child });
            }
            current = self.node(id)?.parent;
        }

        if let Some(old_parent) = old_parent {
            self.detach(old_parent, child);
        }

        if let Some(NodeKind::Container(state)) = self.slot_mut(parent).map(|p| &mut p.kind) {
            state.children.push(child);
        }
        let object = self.object_mut(child)?;
        object.parent = Some(parent);
        object.recompute_origin_offset();
        self.request_recreate(child, Invalidation::Transform);
        Ok(())
    }

    /// Detaches `child` from `parent`. No-op if it is not a child there.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let container = self.node(parent)?.container().ok_or(SceneError::NotAContainer(parent))?;
        if container.children.contains(&child) {
            self.detach(parent, child);
        }
        Ok(())
    }

    pub fn clear_children(&mut self, parent: NodeId) -> Result<()> {
        let children = self
            .node(parent)?
            .container()
            .ok_or(SceneError::NotAContainer(parent))?
            .children
            .clone();
        for child in children {
            self.detach(parent, child);
        }
        Ok(())
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(NodeKind::Container(state)) = self.slot_mut(parent).map(|p| &mut p.kind) {
            state.children.retain(|&id| id != child);
        }
        if let Some(object) = self.slot_mut(child) {
            if object.parent == Some(parent) {
                object.parent = None;
                object.recompute_origin_offset();
            }
        }
        self.request_recreate(child, Invalidation::Transform);
        self.refresh_aggregates(parent);
        self.request_recreate(parent, Invalidation::Object);
    }

    /// Recursively destroys a node and its children, freeing their ids for
    /// reuse.
    pub fn destroy(&mut self, id: NodeId) {
        let Some(object) = self.slot(id) else {
            return;
        };
        let parent = object.parent;
        let children = object.children().to_vec();

        if let Some(parent) = parent {
            self.detach(parent, id);
        }
        for child in children {
            self.destroy(child);
        }

        self.nodes[id] = None;
        self.free_indices.push(id);
    }

    /// Marks part of a node's derived state stale and notifies every
    /// ancestor that its child composition must be rebuilt.
    pub fn request_recreate(&mut self, id: NodeId, kind: Invalidation) {
        let Some(object) = self.slot_mut(id) else {
            return;
        };
        match kind {
            Invalidation::Transform => object.flags.transform = true,
            Invalidation::Object => object.flags.object = true,
        }
        object.flags.content = true;

        let mut next = object.parent;
        while let Some(parent) = next {
            self.refresh_aggregates(parent);
            let Some(object) = self.slot_mut(parent) else {
                break;
            };
            object.flags.object = true;
            object.flags.content = true;
            next = object.parent;
        }
    }

    /// Acknowledges the content change of a node, e.g. after repainting it.
    pub fn clear_content_changed(&mut self, id: NodeId) -> Result<()> {
        self.object_mut(id)?.flags.content = false;
        Ok(())
    }

    fn refresh_aggregates(&mut self, id: NodeId) {
        let Some(NodeKind::Container(state)) = self.slot(id).map(|o| &o.kind) else {
            return;
        };
        let mut timed = false;
        let mut animated = false;
        let mut optimized = true;
        for child in state.children.iter().filter_map(|&c| self.slot(c)) {
            timed |= child.is_timed();
            animated |= child.is_animated();
            optimized &= child.perfectly_optimized();
        }
        if let Some(NodeKind::Container(state)) = self.slot_mut(id).map(|o| &mut o.kind) {
            state.children_timed = timed;
            state.children_animated = animated;
            state.children_perfectly_optimized = optimized;
        }
    }

    /// Binds a new timeline to `property`, starting from the property's
    /// current value. Replaces any timeline already bound to it.
    pub fn register_animation_for(
        &mut self,
        id: NodeId,
        property: AnimatedProperty,
        mapper: impl Fn(f64) -> f64 + 'static,
    ) -> Result<&mut AnimationTimeline<f64>> {
        let base = property_value(self.node(id)?, property);
        self.insert_animation(id, property, AnimationTimeline::new(base, mapper))
    }

    /// Binds `timeline` to `property`.
    pub fn insert_animation(
        &mut self,
        id: NodeId,
        property: AnimatedProperty,
        timeline: AnimationTimeline<f64>,
    ) -> Result<&mut AnimationTimeline<f64>> {
        self.object_mut(id)?.animations.insert(property, timeline);
        self.request_recreate(id, Invalidation::Object);
        self.animation_slot(id, property)
    }

    pub fn get_animation_for(
        &self,
        id: NodeId,
        property: AnimatedProperty,
    ) -> Option<&AnimationTimeline<f64>> {
        self.slot(id)?.animations.get(&property)
    }

    /// Mutable access to a bound timeline.
    ///
    /// Taking mutable access counts as a mutation: the node is invalidated
    /// whether or not the timeline is then changed, so its next snapshot is
    /// rebuilt. Use `get_animation_for` to read, and `jump_animation` to
    /// truncate.
    pub fn get_animation_for_mut(
        &mut self,
        id: NodeId,
        property: AnimatedProperty,
    ) -> Option<&mut AnimationTimeline<f64>> {
        if !self.slot(id)?.animations.contains_key(&property) {
            return None;
        }
        self.request_recreate(id, Invalidation::Object);
        self.animation_slot(id, property).ok()
    }

    /// Rewrites the timeline bound to `property` as if only `time`
    /// milliseconds had played. See `AnimationTimeline::jump`.
    pub fn jump_animation(
        &mut self,
        id: NodeId,
        property: AnimatedProperty,
        time: f64,
    ) -> Result<()> {
        self.animation_slot(id, property)?.jump(time)?;
        self.request_recreate(id, Invalidation::Object);
        Ok(())
    }

    pub fn remove_animation(
        &mut self,
        id: NodeId,
        property: AnimatedProperty,
    ) -> Option<AnimationTimeline<f64>> {
        let timeline = self.slot_mut(id)?.animations.remove(&property)?;
        self.request_recreate(id, Invalidation::Object);
        Some(timeline)
    }

    fn animation_slot(
        &mut self,
        id: NodeId,
        property: AnimatedProperty,
    ) -> Result<&mut AnimationTimeline<f64>> {
        self.object_mut(id)?
            .animations
            .get_mut(&property)
            .ok_or(SceneError::NodeNotFound(id))
    }

    /// Produces the snapshot of `id` (and its subtree) at `time`.
    ///
    /// Timelines are resolved first, through the regular setters. A cached
    /// snapshot is returned as-is when nothing is dirty and it was made for
    /// the same time, or for no particular time.
    pub fn get_snapshot(&mut self, id: NodeId, time: f64) -> Result<Arc<dyn DrawNode>> {
        self.snapshot_node(id, time, false)
    }

    /// `suppressed` is set below a container that does not change with time
    /// alone; only animated descendants follow `time` there.
    fn snapshot_node(
        &mut self,
        id: NodeId,
        time: f64,
        suppressed: bool,
    ) -> Result<Arc<dyn DrawNode>> {
        self.apply_animations(id, time)?;

        let object = self.node(id)?;
        if let Some(cache) = &object.cache {
            let current = cache.time.map_or(true, |cached| cached == time);
            if current && !object.transform_changed() && !object.object_changed() {
                trace!(id, time, "snapshot cache hit");
                return Ok(cache.node.clone());
            }
        }

        let timed = object.is_timed();
        let suppress_children = suppressed
            || !object
                .container()
                .is_some_and(|state| object.timed && state.children_timed);
        let previous = object.cache.as_ref().map(|c| c.node.clone());
        let rebuild_transform = previous.is_none() || object.transform_changed();
        let rebuild_object = previous.is_none() || object.object_changed();

        let transform = match &previous {
            Some(previous) if !rebuild_transform => previous.options().transform.clone(),
            _ => self.resolve_transform(id)?,
        };
        let (fill, stroke) = match &previous {
            Some(previous) if !rebuild_object => {
                (previous.options().fill.clone(), previous.options().stroke.clone())
            }
            _ => {
                let object = self.object_mut(id)?;
                (
                    object.fill.as_mut().map(Style::resolve),
                    object.stroke.as_mut().map(Style::resolve),
                )
            }
        };
        let children = self.snapshot_children(
            id,
            time,
            previous.as_ref(),
            timed || rebuild_object,
            suppress_children,
        )?;

        let object = self.node(id)?;
        let options = NodeOptions {
            transform,
            width: object.width,
            height: object.height,
            show_bounds: object.show_bounds,
            fill,
            stroke,
            line_width: object.line_width,
            clip: object.container().is_some_and(|c| c.clip),
            children,
        };
        let node: Arc<dyn DrawNode> = match (&object.kind, &previous) {
            (NodeKind::Shape(shape), previous) => shape.snapshot(options, previous.as_ref())?,
            (_, Some(previous)) => previous.with(options)?,
            (NodeKind::Container(_), None) => Arc::new(ContainerNode::new(options)),
            (NodeKind::Plain, None) => Arc::new(PlainNode::new(options)),
        };

        let object = self.object_mut(id)?;
        object.flags.transform = false;
        object.flags.object = false;
        object.cache = Some(SnapshotCache {
            time: timed.then_some(time),
            node: node.clone(),
        });
        trace!(id, time, timed, global_id = node.global_id(), "snapshot rebuilt");
        Ok(node)
    }

    fn apply_animations(&mut self, id: NodeId, time: f64) -> Result<()> {
        let object = self.object_mut(id)?;
        if object.animations.is_empty() {
            return Ok(());
        }
        let values: Vec<(AnimatedProperty, f64)> = object
            .animations
            .iter_mut()
            .map(|(property, timeline)| (*property, timeline.get(time)))
            .collect();

        for (property, value) in values {
            if !value.is_finite() {
                debug!(id, property = property.name(), value, "skipping non-finite animated value");
                continue;
            }
            self.node_mut(id)?.set_property(property, value);
        }
        Ok(())
    }

    fn resolve_transform(&self, id: NodeId) -> Result<NodeTransform> {
        let object = self.node(id)?;
        let (offset_x, offset_y) = object.origin_offset;
        let mut x = object.x - offset_x;
        let mut y = object.y - offset_y;
        if let Some(parent) = object.parent {
            let parent = self.node(parent)?;
            x += parent.width * object.anchor.x();
            y += parent.height * object.anchor.y();
        }
        Ok(NodeTransform {
            x,
            y,
            rotation: object.rotation,
            rotation_center_x: offset_x,
            rotation_center_y: offset_y,
            scale_x: object.scale_x,
            scale_y: object.scale_y,
            alpha: object.alpha,
            z_index: object.z_index,
            visible: object.visible,
        })
    }

    fn snapshot_children(
        &mut self,
        id: NodeId,
        time: f64,
        previous: Option<&Arc<dyn DrawNode>>,
        refresh: bool,
        suppressed: bool,
    ) -> Result<Arc<[Arc<dyn DrawNode>]>> {
        let ids = match self.node(id)?.container() {
            Some(state) => state.children.clone(),
            None => return Ok(Arc::from(Vec::new())),
        };
        if let Some(previous) = previous {
            if !refresh {
                return Ok(previous.options().children.clone());
            }
        }

        let mut children = Vec::with_capacity(ids.len());
        for child in ids {
            let at = if suppressed {
                let object = self.node(child)?;
                if object.is_animated() {
                    time
                } else {
                    // Frozen at whatever time it was last produced for.
                    object.cache.as_ref().and_then(|c| c.time).unwrap_or(time)
                }
            } else {
                time
            };
            children.push(self.snapshot_node(child, at, suppressed)?);
        }
        if children.len() > 1 {
            // Stable: equal z keeps insertion order.
            children.sort_by_key(|c| c.z_index());
        }
        Ok(children.into())
    }
}

/// Current value of an animatable property, in the units the node stores.
fn property_value(object: &DrawObject, property: AnimatedProperty) -> f64 {
    let value = match property {
        AnimatedProperty::X => object.x,
        AnimatedProperty::Y => object.y,
        AnimatedProperty::Rotation => object.rotation,
        AnimatedProperty::Width => object.width,
        AnimatedProperty::Height => object.height,
        AnimatedProperty::Scale => object.scale(),
        AnimatedProperty::ScaleX => object.scale_x,
        AnimatedProperty::ScaleY => object.scale_y,
        AnimatedProperty::Alpha => object.alpha,
        AnimatedProperty::ZIndex => object.z_index as f32,
        AnimatedProperty::Radius => object.radius().unwrap_or(0.0),
    };
    f64::from(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Anchor;

    fn sized(width: f32, height: f32) -> ObjectOptions {
        ObjectOptions {
            width,
            height,
            ..Default::default()
        }
    }

    fn settle(scene: &mut SceneGraph, root: NodeId) {
        scene.get_snapshot(root, 0.0).unwrap();
    }

    #[test]
    fn add_child_rejects_self_parent() {
        let mut scene = SceneGraph::new();
        let id = scene.add_container(ObjectOptions::default());

        let err = scene.add_child(id, id).unwrap_err();
        assert!(matches!(err, SceneError::HierarchyCycle { .. }));
        assert!(scene.node(id).is_ok());
    }

    #[test]
    fn add_child_rejects_cycle() {
        let mut scene = SceneGraph::new();
        let a = scene.add_container(ObjectOptions::default());
        let b = scene.add_container(ObjectOptions::default());
        let c = scene.add_container(ObjectOptions::default());

        scene.add_child(a, b).unwrap();
        scene.add_child(b, c).unwrap();
        assert!(
            scene.add_child(c, a).is_err(),
            "cycle creation must be rejected"
        );
        assert_eq!(scene.node(a).unwrap().parent(), None);
    }

    #[test]
    fn add_child_requires_container() {
        let mut scene = SceneGraph::new();
        let rect = scene.add_rectangle(ObjectOptions::default());
        let other = scene.add_rectangle(ObjectOptions::default());
        let err = scene.add_child(rect, other).unwrap_err();
        assert!(matches!(err, SceneError::NotAContainer(id) if id == rect));
        assert!(matches!(
            scene.add_child(rect, 99),
            Err(SceneError::NotAContainer(_)) | Err(SceneError::NodeNotFound(_))
        ));
    }

    #[test]
    fn reparent_child_detaches_from_old_parent() {
        let mut scene = SceneGraph::new();
        let p1 = scene.add_container(ObjectOptions::default());
        let p2 = scene.add_container(ObjectOptions::default());
        let child = scene.add_rectangle(ObjectOptions::default());

        scene.add_child(p1, child).unwrap();
        scene.add_child(p2, child).unwrap();

        assert!(!scene.node(p1).unwrap().children().contains(&child));
        assert!(scene.node(p2).unwrap().children().contains(&child));
        assert_eq!(scene.node(child).unwrap().parent(), Some(p2));
    }

    #[test]
    fn adding_twice_is_a_no_op() {
        let mut scene = SceneGraph::new();
        let parent = scene.add_container(ObjectOptions::default());
        let child = scene.add_rectangle(ObjectOptions::default());
        scene.add_child(parent, child).unwrap();
        settle(&mut scene, parent);

        scene.add_child(parent, child).unwrap();
        assert_eq!(scene.node(parent).unwrap().children(), &[child]);
        assert!(!scene.node(parent).unwrap().object_changed());
    }

    #[test]
    fn setting_same_value_keeps_flags_clear() {
        let mut scene = SceneGraph::new();
        let parent = scene.add_container(ObjectOptions::default());
        let child = scene.add_rectangle(ObjectOptions {
            x: 5.0,
            width: 10.0,
            ..Default::default()
        });
        scene.add_child(parent, child).unwrap();
        settle(&mut scene, parent);
        scene.clear_content_changed(parent).unwrap();
        scene.clear_content_changed(child).unwrap();

        scene
            .node_mut(child)
            .unwrap()
            .set_x(5.0)
            .set_width(10.0)
            .set_anchor(Anchor::TOP_LEFT);

        for id in [parent, child] {
            let node = scene.node(id).unwrap();
            assert!(!node.transform_changed());
            assert!(!node.object_changed());
            assert!(!node.content_changed());
        }
    }

    #[test]
    fn child_change_dirties_parent_object_only() {
        let mut scene = SceneGraph::new();
        let root = scene.add_container(ObjectOptions::default());
        let mid = scene.add_container(ObjectOptions::default());
        let leaf = scene.add_rectangle(ObjectOptions::default());
        scene.add_child(root, mid).unwrap();
        scene.add_child(mid, leaf).unwrap();
        settle(&mut scene, root);

        scene.node_mut(leaf).unwrap().set_y(3.0);

        let leaf_node = scene.node(leaf).unwrap();
        assert!(leaf_node.transform_changed());
        assert!(!leaf_node.object_changed());
        for id in [mid, root] {
            let node = scene.node(id).unwrap();
            assert!(node.object_changed());
            assert!(!node.transform_changed());
            assert!(node.content_changed());
        }
    }

    #[test]
    fn size_change_raises_both_bits_and_moves_origin() {
        let mut scene = SceneGraph::new();
        let id = scene.add_rectangle(ObjectOptions {
            origin: Anchor::CENTRE,
            ..sized(10.0, 10.0)
        });
        settle(&mut scene, id);

        scene.node_mut(id).unwrap().set_width(20.0);
        let node = scene.node(id).unwrap();
        assert!(node.transform_changed());
        assert!(node.object_changed());
        assert_eq!(node.origin_offset(), (10.0, 5.0));
    }

    #[test]
    fn container_resize_invalidates_anchored_children() {
        let mut scene = SceneGraph::new();
        let parent = scene.add_container(sized(100.0, 100.0));
        let pinned = scene.add_rectangle(ObjectOptions::default());
        let right = scene.add_rectangle(ObjectOptions {
            anchor: Anchor::RIGHT,
            ..Default::default()
        });
        scene.add_child(parent, pinned).unwrap();
        scene.add_child(parent, right).unwrap();
        settle(&mut scene, parent);

        scene.node_mut(parent).unwrap().set_width(200.0);
        assert!(!scene.node(pinned).unwrap().transform_changed());
        assert!(scene.node(right).unwrap().transform_changed());

        let snapshot = scene.get_snapshot(parent, 0.0).unwrap();
        let xs: Vec<f32> = snapshot.children().iter().map(|c| c.options().transform.x).collect();
        assert_eq!(xs, vec![0.0, 200.0]);
    }

    #[test]
    fn aggregates_follow_children() {
        let mut scene = SceneGraph::new();
        let parent = scene.add_container(ObjectOptions::default());
        let rect = scene.add_rectangle(ObjectOptions::default());
        let plain = scene.add_plain(ObjectOptions::default());

        scene.add_child(parent, rect).unwrap();
        let state = scene.node(parent).unwrap().container().unwrap();
        assert!(!state.children_timed());
        assert!(!state.children_animated());

        scene.add_child(parent, plain).unwrap();
        assert!(scene.node(parent).unwrap().container().unwrap().children_timed());
        assert!(scene.node(parent).unwrap().is_timed());

        scene
            .register_animation_for(rect, AnimatedProperty::X, crate::units::direct)
            .unwrap()
            .to(10.0, 100.0);
        assert!(scene.node(parent).unwrap().container().unwrap().children_animated());

        scene.remove_child(parent, plain).unwrap();
        scene.remove_animation(rect, AnimatedProperty::X).unwrap();
        let state = scene.node(parent).unwrap().container().unwrap();
        assert!(!state.children_timed());
        assert!(!state.children_animated());
    }

    #[test]
    fn clear_children_detaches_all() {
        let mut scene = SceneGraph::new();
        let parent = scene.add_container(ObjectOptions::default());
        let a = scene.add_rectangle(ObjectOptions::default());
        let b = scene.add_circle(ObjectOptions::default());
        scene.add_child(parent, a).unwrap();
        scene.add_child(parent, b).unwrap();

        scene.clear_children(parent).unwrap();
        assert!(scene.node(parent).unwrap().children().is_empty());
        assert_eq!(scene.node(a).unwrap().parent(), None);
        assert_eq!(scene.node(b).unwrap().parent(), None);
    }

    #[test]
    fn destroy_frees_subtree() {
        let mut scene = SceneGraph::new();
        let root = scene.add_container(ObjectOptions::default());
        let group = scene.add_container(ObjectOptions::default());
        let leaf = scene.add_rectangle(ObjectOptions::default());
        scene.add_child(root, group).unwrap();
        scene.add_child(group, leaf).unwrap();

        scene.destroy(group);
        assert_eq!(scene.len(), 1);
        assert!(scene.node(root).unwrap().children().is_empty());
        assert!(matches!(scene.node(leaf), Err(SceneError::NodeNotFound(_))));

        let reused = scene.add_plain(ObjectOptions::default());
        assert!(reused == group || reused == leaf);
    }

    #[test]
    fn position_uses_parent_anchor_and_origin() {
        let mut scene = SceneGraph::new();
        let parent = scene.add_container(sized(200.0, 100.0));
        let child = scene.add_rectangle(ObjectOptions {
            x: 10.0,
            y: 0.0,
            anchor: Anchor::CENTRE,
            origin: Anchor::CENTRE,
            ..sized(20.0, 20.0)
        });
        scene.add_child(parent, child).unwrap();

        let snapshot = scene.get_snapshot(child, 0.0).unwrap();
        let t = &snapshot.options().transform;
        assert_eq!((t.x, t.y), (100.0, 40.0));
        assert_eq!((t.rotation_center_x, t.rotation_center_y), (10.0, 10.0));

        // Without a parent the anchor no longer applies.
        scene.remove_child(parent, child).unwrap();
        let snapshot = scene.get_snapshot(child, 0.0).unwrap();
        assert_eq!(snapshot.options().transform.x, 0.0);
    }
}
