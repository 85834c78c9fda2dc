//! # Snapshot Nodes
//!
//! Immutable draw records produced by the scene graph for one timeline
//! position, and consumed by the renderer.
//!
//! ## Key Types
//! - `DrawNode`: the drawable contract. `render` applies the resolved
//!   transform and delegates to the kind-specific `draw`.
//! - `NodeOptions` / `NodeTransform`: the fully resolved draw parameters.
//! - `PlainNode`, `ContainerNode`, `RectangleNode`, `CircleNode`: the
//!   built-in kinds.
//!
//! A snapshot node is never mutated after construction. `with` builds a new
//! node of the same kind from fresh options and may carry over expensive
//! derived data (a clip path, a circle path) from `self`.

mod container;
mod shape;

pub use container::ContainerNode;
pub use shape::{CircleNode, RectangleNode};

use crate::error::{Result, SceneError};
use crate::style::ResolvedStyle;
use crate::surface::Surface;
use crate::types::Color;
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::warn;

static NEXT_GLOBAL_ID: AtomicU64 = AtomicU64::new(1);

/// Returns a process-wide, monotonically increasing identity.
///
/// Only used for diagnostics and for telling snapshot nodes apart.
pub fn next_global_id() -> u64 {
    NEXT_GLOBAL_ID.fetch_add(1, Ordering::Relaxed)
}

/// Pale red painted over the bounds of nodes with `show_bounds`.
const BOUNDS_COLOR: Color = Color::rgba(1.0, 0xdd as f32 / 255.0, 0xdd as f32 / 255.0, 1.0);
const BOUNDS_ALPHA: f32 = 0.1;

/// Resolved placement of a node relative to its parent.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeTransform {
    /// Draw position, already corrected for origin and parent anchoring.
    pub x: f32,
    pub y: f32,
    /// Radians.
    pub rotation: f32,
    pub rotation_center_x: f32,
    pub rotation_center_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub alpha: f32,
    pub z_index: i32,
    pub visible: bool,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            rotation_center_x: 0.0,
            rotation_center_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            alpha: 1.0,
            z_index: 0,
            visible: true,
        }
    }
}

/// Everything a snapshot node needs to draw itself.
#[derive(Clone, Debug)]
pub struct NodeOptions {
    pub transform: NodeTransform,
    pub width: f32,
    pub height: f32,
    pub show_bounds: bool,
    pub fill: Option<ResolvedStyle>,
    pub stroke: Option<ResolvedStyle>,
    pub line_width: f32,
    /// Containers only: clip children to the node bounds.
    pub clip: bool,
    /// Containers only: children in draw order.
    pub children: Arc<[Arc<dyn DrawNode>]>,
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            transform: NodeTransform::default(),
            width: 0.0,
            height: 0.0,
            show_bounds: false,
            fill: None,
            stroke: None,
            line_width: 1.0,
            clip: false,
            children: Arc::from(Vec::new()),
        }
    }
}

/// An immutable, drawable snapshot of a scene node.
pub trait DrawNode: Any + fmt::Debug + Send + Sync {
    /// Name of the concrete kind, used in error messages.
    fn type_name(&self) -> &'static str;

    fn options(&self) -> &NodeOptions;

    fn global_id(&self) -> u64;

    fn as_any(&self) -> &dyn Any;

    /// Builds a node of the same kind from `options`, reusing whatever
    /// derived data of `self` is still valid.
    fn with(&self, _options: NodeOptions) -> Result<Arc<dyn DrawNode>> {
        Err(SceneError::NotImplemented {
            type_name: self.type_name(),
            method: "with",
        })
    }

    /// Draws the node in its local coordinate space.
    fn draw(&self, _surface: &mut dyn Surface) -> Result<()> {
        Err(SceneError::NotImplemented {
            type_name: self.type_name(),
            method: "draw",
        })
    }

    fn width(&self) -> f32 {
        self.options().width
    }

    fn height(&self) -> f32 {
        self.options().height
    }

    fn z_index(&self) -> i32 {
        self.options().transform.z_index
    }

    fn children(&self) -> &[Arc<dyn DrawNode>] {
        &self.options().children
    }

    /// Applies translate, rotate-about-center, scale and alpha, then draws.
    ///
    /// Invisible and fully transparent nodes are skipped. The surface state
    /// is restored even when drawing fails.
    fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        let options = self.options();
        let t = &options.transform;
        if !t.visible || t.alpha <= 0.0 {
            return Ok(());
        }

        surface.save();
        apply_transform(t, surface);

        if options.show_bounds {
            let alpha = surface.global_alpha();
            surface.set_global_alpha(alpha * BOUNDS_ALPHA);
            surface.fill_rect(
                options.width,
                options.height,
                &ResolvedStyle::Color(BOUNDS_COLOR),
            );
            surface.set_global_alpha(alpha);
        }

        let result = self.draw(surface);
        surface.restore();
        result
    }
}

fn apply_transform(t: &NodeTransform, surface: &mut dyn Surface) {
    if t.x != 0.0 || t.y != 0.0 {
        surface.translate(t.x, t.y);
    }
    if t.rotation != 0.0 {
        surface.translate(t.rotation_center_x, t.rotation_center_y);
        surface.rotate(t.rotation);
        surface.translate(-t.rotation_center_x, -t.rotation_center_y);
    }
    if t.scale_x != 1.0 || t.scale_y != 1.0 {
        surface.scale(t.scale_x, t.scale_y);
    }
    if t.alpha < 1.0 {
        let alpha = surface.global_alpha();
        surface.set_global_alpha(alpha * t.alpha);
    }
}

/// Snapshot of a scene node with no visual content of its own.
///
/// Scene nodes are expected to be containers or shapes; building a plain
/// node usually means a kind was forgotten, so construction logs a warning.
#[derive(Debug)]
pub struct PlainNode {
    options: NodeOptions,
    global_id: u64,
}

impl PlainNode {
    pub fn new(options: NodeOptions) -> Self {
        warn!("constructing a plain snapshot node with no drawable content");
        Self {
            options,
            global_id: next_global_id(),
        }
    }
}

impl DrawNode for PlainNode {
    fn type_name(&self) -> &'static str {
        "PlainNode"
    }

    fn options(&self) -> &NodeOptions {
        &self.options
    }

    fn global_id(&self) -> u64 {
        self.global_id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn with(&self, options: NodeOptions) -> Result<Arc<dyn DrawNode>> {
        Ok(Arc::new(PlainNode::new(options)))
    }

    fn draw(&self, _surface: &mut dyn Surface) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixmapSurface;

    #[derive(Debug)]
    struct Unfinished {
        options: NodeOptions,
    }

    impl DrawNode for Unfinished {
        fn type_name(&self) -> &'static str {
            "Unfinished"
        }

        fn options(&self) -> &NodeOptions {
            &self.options
        }

        fn global_id(&self) -> u64 {
            0
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn missing_operations_fail_fast() {
        let node = Unfinished {
            options: NodeOptions::default(),
        };
        let mut surface = PixmapSurface::new(4, 4).unwrap();

        let err = node.render(&mut surface).unwrap_err();
        assert!(matches!(
            err,
            SceneError::NotImplemented { method: "draw", .. }
        ));
        assert_eq!(surface.depth(), 0, "render must restore on failure");

        let err = node.with(NodeOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "Unfinished::with is not implemented");
    }

    #[test]
    fn hidden_nodes_are_skipped() {
        let mut options = NodeOptions::default();
        options.transform.visible = false;
        let node = Unfinished { options };
        let mut surface = PixmapSurface::new(4, 4).unwrap();
        assert!(node.render(&mut surface).is_ok());
    }

    #[test]
    fn global_ids_increase() {
        let a = PlainNode::new(NodeOptions::default());
        let b = a.with(NodeOptions::default()).unwrap();
        assert!(b.global_id() > a.global_id());
    }

    #[test]
    fn show_bounds_paints_pale_overlay() {
        let node = PlainNode::new(NodeOptions {
            width: 4.0,
            height: 4.0,
            show_bounds: true,
            ..NodeOptions::default()
        });
        let mut surface = PixmapSurface::new(8, 8).unwrap();
        node.render(&mut surface).unwrap();

        let [_, _, _, a] = surface.pixel(1, 1).unwrap();
        assert!(a > 0 && a < 64, "overlay alpha was {a}");
        assert_eq!(surface.pixel(6, 6), Some([0, 0, 0, 0]));
    }
}
