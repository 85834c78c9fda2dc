//! # Tableau Core
//!
//! A retained-mode 2D scene graph. Callers build a mutable tree of scene
//! nodes in a `SceneGraph`; `SceneGraph::get_snapshot` turns it into an
//! immutable tree of `DrawNode`s for one timeline position, rebuilding only
//! what changed since the last call; a `Renderer` draws that tree onto a
//! `Surface`.
//!
//! ## Modules
//! - `animation`: easing curves, segments and timelines.
//! - `scene`: the scene graph, scene nodes, dirty bits and snapshotting.
//! - `node`: immutable snapshot nodes.
//! - `style`: colors, gradients and their resolved form.
//! - `surface` / `renderer`: the drawing surface and a full-repaint renderer.
//! - `schema`: JSON scene descriptions.

pub mod animation;
pub mod error;
pub mod node;
pub mod renderer;
pub mod scene;
pub mod schema;
pub mod style;
pub mod surface;
pub mod types;
pub mod units;

pub use animation::{AnimatedProperty, AnimationSegment, AnimationTimeline, Easing};
pub use error::{Result, SceneError};
pub use node::{DrawNode, NodeOptions, NodeTransform};
pub use renderer::Renderer;
pub use scene::{DrawObject, Invalidation, NodeKind, NodeMut, ObjectOptions, SceneGraph, Shape};
pub use schema::{LoadedScene, SceneDescription};
pub use style::{Gradient, ResolvedStyle, Style};
pub use surface::{PixmapSurface, Surface, SurfaceConfig};
pub use types::{Anchor, Color, NodeId, Vector2};
