//! Full-repaint renderer: clears the surface and renders a snapshot tree.

use crate::error::Result;
use crate::node::DrawNode;
use crate::scene::SceneGraph;
use crate::surface::{PixmapSurface, Surface, SurfaceConfig};
use crate::types::{Color, NodeId};
use std::sync::Arc;
use tracing::debug;

pub struct Renderer<S: Surface = PixmapSurface> {
    surface: S,
    background: Color,
}

impl Renderer<PixmapSurface> {
    pub fn from_config(config: &SurfaceConfig) -> Result<Self> {
        Ok(Self::new(PixmapSurface::from_config(config)?, config.background))
    }
}

impl<S: Surface> Renderer<S> {
    pub fn new(surface: S, background: Color) -> Self {
        Self {
            surface,
            background,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn render(&mut self, root: &dyn DrawNode) -> Result<()> {
        self.surface.clear(self.background);
        root.render(&mut self.surface)
    }

    /// Snapshots `root` at `time`, renders it and acknowledges its content
    /// change.
    pub fn render_frame(
        &mut self,
        scene: &mut SceneGraph,
        root: NodeId,
        time: f64,
    ) -> Result<Arc<dyn DrawNode>> {
        let snapshot = scene.get_snapshot(root, time)?;
        debug!(root, time, global_id = snapshot.global_id(), "rendering frame");
        self.render(snapshot.as_ref())?;
        scene.clear_content_changed(root)?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ObjectOptions;
    use crate::style::Style;

    #[test]
    fn renders_background_and_scene() {
        let mut scene = SceneGraph::new();
        let root = scene.add_container(ObjectOptions {
            width: 10.0,
            height: 10.0,
            ..Default::default()
        });
        let rect = scene.add_rectangle(ObjectOptions {
            x: 5.0,
            width: 5.0,
            height: 10.0,
            fill: Some(Style::Color(Color::BLACK)),
            ..Default::default()
        });
        scene.add_child(root, rect).unwrap();

        let config = SurfaceConfig {
            width: 10,
            height: 10,
            background: Color::WHITE,
        };
        let mut renderer = Renderer::from_config(&config).unwrap();
        renderer.render_frame(&mut scene, root, 0.0).unwrap();

        assert_eq!(renderer.surface().pixel(2, 2), Some([255, 255, 255, 255]));
        assert_eq!(renderer.surface().pixel(7, 2), Some([0, 0, 0, 255]));
        assert!(!scene.node(root).unwrap().content_changed());
    }
}
