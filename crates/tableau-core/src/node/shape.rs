use super::{next_global_id, DrawNode, NodeOptions};
use crate::error::Result;
use crate::surface::Surface;
use std::any::Any;
use std::sync::Arc;
use tiny_skia::{Path, PathBuilder, Rect};

/// Fills and strokes its bounds.
#[derive(Debug)]
pub struct RectangleNode {
    options: NodeOptions,
    global_id: u64,
}

impl RectangleNode {
    pub fn new(options: NodeOptions) -> Self {
        Self {
            options,
            global_id: next_global_id(),
        }
    }
}

impl DrawNode for RectangleNode {
    fn type_name(&self) -> &'static str {
        "RectangleNode"
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
        Ok(Arc::new(RectangleNode::new(options)))
    }

    fn draw(&self, surface: &mut dyn Surface) -> Result<()> {
        let o = &self.options;
        if let Some(fill) = &o.fill {
            surface.fill_rect(o.width, o.height, fill);
        }
        if let Some(stroke) = &o.stroke {
            if let Some(rect) = Rect::from_xywh(0.0, 0.0, o.width, o.height) {
                if o.line_width > 0.0 {
                    surface.stroke_path(&PathBuilder::from_rect(rect), stroke, o.line_width);
                }
            }
        }
        Ok(())
    }
}

/// A circle inscribed in its bounds, radius `width / 2`.
///
/// The circle path is kept across snapshots while the radius stays the same.
#[derive(Debug)]
pub struct CircleNode {
    options: NodeOptions,
    global_id: u64,
    radius: f32,
    path: Option<Arc<Path>>,
}

impl CircleNode {
    pub fn new(options: NodeOptions) -> Self {
        let radius = options.width / 2.0;
        let path = if radius > 0.0 {
            PathBuilder::from_circle(radius, radius, radius).map(Arc::new)
        } else {
            None
        };
        Self {
            options,
            global_id: next_global_id(),
            radius,
            path,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn path(&self) -> Option<&Arc<Path>> {
        self.path.as_ref()
    }
}

impl DrawNode for CircleNode {
    fn type_name(&self) -> &'static str {
        "CircleNode"
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
        let radius = options.width / 2.0;
        if radius != self.radius {
            return Ok(Arc::new(CircleNode::new(options)));
        }
        Ok(Arc::new(CircleNode {
            options,
            global_id: next_global_id(),
            radius,
            path: self.path.clone(),
        }))
    }

    fn draw(&self, surface: &mut dyn Surface) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let o = &self.options;
        if let Some(fill) = &o.fill {
            surface.fill_path(path, fill);
        }
        if let Some(stroke) = &o.stroke {
            if o.line_width > 0.0 {
                surface.stroke_path(path, stroke, o.line_width);
            }
        }
        Ok(())
    }
}
