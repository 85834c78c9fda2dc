use super::object::{DrawObject, Invalidation, NodeKind};
use super::SceneGraph;
use crate::animation::AnimatedProperty;
use crate::style::Style;
use crate::types::{NodeId, Vector2};
use tracing::debug;

/// Setter handle for one scene node.
///
/// Every setter is a no-op when the value is unchanged. Otherwise it stores
/// the value, refreshes derived state and raises the matching invalidation.
/// Setters chain:
///
/// ```ignore
/// scene.node_mut(id)?.set_x(10.0).set_alpha(0.5);
/// ```
pub struct NodeMut<'a> {
    graph: &'a mut SceneGraph,
    id: NodeId,
}

impl<'a> NodeMut<'a> {
    pub(crate) fn new(graph: &'a mut SceneGraph, id: NodeId) -> Self {
        Self { graph, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    fn object(&mut self) -> Option<&mut DrawObject> {
        self.graph.slot_mut(self.id)
    }

    /// NaN never compares equal to itself, so non-finite input is refused
    /// rather than dirtying the node on every call.
    fn finite(&self, field: &'static str, value: f32) -> bool {
        if value.is_finite() {
            return true;
        }
        debug!(id = self.id, field, value, "ignoring non-finite value");
        false
    }

    fn update<T: PartialEq>(
        &mut self,
        kind: Invalidation,
        field: fn(&mut DrawObject) -> &mut T,
        value: T,
    ) -> bool {
        let Some(object) = self.object() else {
            return false;
        };
        let slot = field(object);
        if *slot == value {
            return false;
        }
        *slot = value;
        self.graph.request_recreate(self.id, kind);
        true
    }

    fn update_with_origin<T: PartialEq>(
        &mut self,
        field: fn(&mut DrawObject) -> &mut T,
        value: T,
    ) {
        let Some(object) = self.object() else {
            return;
        };
        let slot = field(object);
        if *slot == value {
            return;
        }
        *slot = value;
        object.recompute_origin_offset();
        self.graph.request_recreate(self.id, Invalidation::Transform);
    }

    pub fn set_x(&mut self, x: f32) -> &mut Self {
        if !self.finite("x", x) {
            return self;
        }
        self.update(Invalidation::Transform, |o| &mut o.x, x);
        self
    }

    pub fn set_y(&mut self, y: f32) -> &mut Self {
        if !self.finite("y", y) {
            return self;
        }
        self.update(Invalidation::Transform, |o| &mut o.y, y);
        self
    }

    /// Radians.
    pub fn set_rotation(&mut self, rotation: f32) -> &mut Self {
        if !self.finite("rotation", rotation) {
            return self;
        }
        self.update(Invalidation::Transform, |o| &mut o.rotation, rotation);
        self
    }

    pub fn set_alpha(&mut self, alpha: f32) -> &mut Self {
        if !self.finite("alpha", alpha) {
            return self;
        }
        self.update(Invalidation::Transform, |o| &mut o.alpha, alpha);
        self
    }

    pub fn set_z_index(&mut self, z_index: i32) -> &mut Self {
        self.update(Invalidation::Transform, |o| &mut o.z_index, z_index);
        self
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.update(Invalidation::Transform, |o| &mut o.visible, visible);
        self
    }

    pub fn set_scale_x(&mut self, scale_x: f32) -> &mut Self {
        if !self.finite("scale_x", scale_x) {
            return self;
        }
        self.update_with_origin(|o| &mut o.scale_x, scale_x);
        self
    }

    pub fn set_scale_y(&mut self, scale_y: f32) -> &mut Self {
        if !self.finite("scale_y", scale_y) {
            return self;
        }
        self.update_with_origin(|o| &mut o.scale_y, scale_y);
        self
    }

    /// Sets both scale axes.
    pub fn set_scale(&mut self, scale: f32) -> &mut Self {
        self.set_scale_x(scale).set_scale_y(scale)
    }

    /// Stores a frozen copy of `anchor`.
    pub fn set_anchor(&mut self, anchor: Vector2) -> &mut Self {
        self.update(Invalidation::Transform, |o| &mut o.anchor, anchor.freeze());
        self
    }

    /// Stores a frozen copy of `origin`.
    pub fn set_origin(&mut self, origin: Vector2) -> &mut Self {
        self.update_with_origin(|o| &mut o.origin, origin.freeze());
        self
    }

    pub fn set_width(&mut self, width: f32) -> &mut Self {
        self.resize(Some(width), None);
        self
    }

    pub fn set_height(&mut self, height: f32) -> &mut Self {
        self.resize(None, Some(height));
        self
    }

    pub fn set_size(&mut self, width: f32, height: f32) -> &mut Self {
        self.resize(Some(width), Some(height));
        self
    }

    /// Circles only: sets width and height to `2 * radius`.
    pub fn set_radius(&mut self, radius: f32) -> &mut Self {
        let has_radius = self.graph.slot(self.id).is_some_and(|o| o.radius().is_some());
        if !has_radius {
            debug!(id = self.id, "ignoring radius on a node without one");
            return self;
        }
        self.set_size(radius * 2.0, radius * 2.0)
    }

    /// Size changes move the origin, so they raise both invalidations.
    /// Children anchored away from the changed edge move with it.
    fn resize(&mut self, width: Option<f32>, height: Option<f32>) {
        let width = width.filter(|&w| self.finite("width", w));
        let height = height.filter(|&h| self.finite("height", h));
        let Some(object) = self.object() else {
            return;
        };
        let width_changed = width.is_some_and(|w| w != object.width);
        let height_changed = height.is_some_and(|h| h != object.height);
        if !width_changed && !height_changed {
            return;
        }
        if let Some(width) = width {
            object.width = width;
        }
        if let Some(height) = height {
            object.height = height;
        }
        object.recompute_origin_offset();

        let id = self.id;
        let moved: Vec<NodeId> = match self.graph.slot(id) {
            Some(object) => object
                .children()
                .iter()
                .copied()
                .filter(|&child| {
                    self.graph.slot(child).is_some_and(|c| {
                        (width_changed && c.anchor.x() != 0.0)
                            || (height_changed && c.anchor.y() != 0.0)
                    })
                })
                .collect(),
            None => Vec::new(),
        };

        self.graph.request_recreate(id, Invalidation::Transform);
        self.graph.request_recreate(id, Invalidation::Object);
        for child in moved {
            self.graph.request_recreate(child, Invalidation::Transform);
        }
    }

    pub fn set_show_bounds(&mut self, show_bounds: bool) -> &mut Self {
        self.update(Invalidation::Object, |o| &mut o.show_bounds, show_bounds);
        self
    }

    pub fn set_fill(&mut self, fill: Option<Style>) -> &mut Self {
        self.update(Invalidation::Object, |o| &mut o.fill, fill);
        self
    }

    pub fn set_stroke(&mut self, stroke: Option<Style>) -> &mut Self {
        self.update(Invalidation::Object, |o| &mut o.stroke, stroke);
        self
    }

    pub fn set_line_width(&mut self, line_width: f32) -> &mut Self {
        if !self.finite("line_width", line_width) {
            return self;
        }
        self.update(Invalidation::Object, |o| &mut o.line_width, line_width);
        self
    }

    /// Declares whether the node changes with time alone.
    pub fn set_timed(&mut self, timed: bool) -> &mut Self {
        self.update(Invalidation::Object, |o| &mut o.timed, timed);
        self
    }

    /// Containers only.
    pub fn set_clip(&mut self, clip: bool) -> &mut Self {
        let Some(object) = self.object() else {
            return self;
        };
        let NodeKind::Container(state) = &mut object.kind else {
            debug!(id = self.id, "ignoring clip on a node that is not a container");
            return self;
        };
        if state.clip != clip {
            state.clip = clip;
            self.graph.request_recreate(self.id, Invalidation::Object);
        }
        self
    }

    /// Assigns an animated value to its property through the setters.
    pub fn set_property(&mut self, property: AnimatedProperty, value: f64) -> &mut Self {
        let v = value as f32;
        match property {
            AnimatedProperty::X => self.set_x(v),
            AnimatedProperty::Y => self.set_y(v),
            AnimatedProperty::Rotation => self.set_rotation(v),
            AnimatedProperty::Width => self.set_width(v),
            AnimatedProperty::Height => self.set_height(v),
            AnimatedProperty::Scale => self.set_scale(v),
            AnimatedProperty::ScaleX => self.set_scale_x(v),
            AnimatedProperty::ScaleY => self.set_scale_y(v),
            AnimatedProperty::Alpha => self.set_alpha(v),
            AnimatedProperty::ZIndex => self.set_z_index(value.round() as i32),
            AnimatedProperty::Radius => self.set_radius(v),
        }
    }
}
