use super::{next_global_id, DrawNode, NodeOptions};
use crate::error::Result;
use crate::surface::Surface;
use std::any::Any;
use std::sync::Arc;
use tiny_skia::{Path, PathBuilder, Rect};

/// Snapshot of a container: its children in ascending z order, optionally
/// clipped to the container bounds.
#[derive(Debug)]
pub struct ContainerNode {
    options: NodeOptions,
    global_id: u64,
    clip_path: Option<Arc<Path>>,
}

impl ContainerNode {
    pub fn new(options: NodeOptions) -> Self {
        let clip_path = if options.clip {
            clip_rect(options.width, options.height)
        } else {
            None
        };
        Self {
            options,
            global_id: next_global_id(),
            clip_path,
        }
    }

    pub fn clip_path(&self) -> Option<&Arc<Path>> {
        self.clip_path.as_ref()
    }
}

fn clip_rect(width: f32, height: f32) -> Option<Arc<Path>> {
    let rect = Rect::from_xywh(0.0, 0.0, width, height)?;
    Some(Arc::new(PathBuilder::from_rect(rect)))
}

impl DrawNode for ContainerNode {
    fn type_name(&self) -> &'static str {
        "ContainerNode"
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
        let same_bounds =
            self.options.width == options.width && self.options.height == options.height;
        if options.clip && self.options.clip && same_bounds {
            return Ok(Arc::new(ContainerNode {
                clip_path: self.clip_path.clone(),
                options,
                global_id: next_global_id(),
            }));
        }
        Ok(Arc::new(ContainerNode::new(options)))
    }

    fn draw(&self, surface: &mut dyn Surface) -> Result<()> {
        if let Some(path) = &self.clip_path {
            surface.clip_path(path);
        }
        for child in self.options.children.iter() {
            child.render(surface)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::RectangleNode;
    use crate::style::ResolvedStyle;
    use crate::surface::PixmapSurface;
    use crate::types::Color;

    fn square(x: f32, size: f32, color: Color) -> Arc<dyn DrawNode> {
        let mut options = NodeOptions {
            width: size,
            height: size,
            fill: Some(ResolvedStyle::Color(color)),
            ..NodeOptions::default()
        };
        options.transform.x = x;
        Arc::new(RectangleNode::new(options))
    }

    #[test]
    fn reuses_clip_path_while_bounds_are_unchanged() {
        let options = NodeOptions {
            width: 10.0,
            height: 10.0,
            clip: true,
            ..NodeOptions::default()
        };
        let first = ContainerNode::new(options.clone());
        let second = first.with(options.clone()).unwrap();
        let second = second.as_any().downcast_ref::<ContainerNode>().unwrap();
        assert!(Arc::ptr_eq(
            first.clip_path().unwrap(),
            second.clip_path().unwrap()
        ));

        let resized = second
            .with(NodeOptions {
                width: 20.0,
                ..options
            })
            .unwrap();
        let resized = resized.as_any().downcast_ref::<ContainerNode>().unwrap();
        assert!(!Arc::ptr_eq(
            first.clip_path().unwrap(),
            resized.clip_path().unwrap()
        ));
    }

    #[test]
    fn clip_hides_children_outside_bounds() {
        let children: Vec<Arc<dyn DrawNode>> = vec![square(0.0, 8.0, Color::WHITE)];
        let container = ContainerNode::new(NodeOptions {
            width: 4.0,
            height: 4.0,
            clip: true,
            children: children.into(),
            ..NodeOptions::default()
        });

        let mut surface = PixmapSurface::new(8, 8).unwrap();
        container.render(&mut surface).unwrap();
        assert_eq!(surface.pixel(1, 1), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(6, 6), Some([0, 0, 0, 0]));
    }

    #[test]
    fn later_children_paint_over_earlier_ones() {
        let children: Vec<Arc<dyn DrawNode>> = vec![
            square(0.0, 4.0, Color::WHITE),
            square(2.0, 4.0, Color::BLACK),
        ];
        let container = ContainerNode::new(NodeOptions {
            width: 8.0,
            height: 8.0,
            children: children.into(),
            ..NodeOptions::default()
        });

        let mut surface = PixmapSurface::new(8, 8).unwrap();
        container.render(&mut surface).unwrap();
        assert_eq!(surface.pixel(3, 1), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(1, 1), Some([255, 255, 255, 255]));
    }
}
