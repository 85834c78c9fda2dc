//! # Drawing Surface
//!
//! The 2D surface contract consumed by snapshot nodes, and a tiny-skia
//! raster implementation of it.
//!
//! ## Key Types
//! - `Surface`: canvas-style state machine (save/restore, transform, global
//!   alpha, clip) plus the few fill/stroke primitives shapes need.
//! - `PixmapSurface`: `Surface` over a `tiny_skia::Pixmap`.
//! - `SurfaceConfig`: size and background for a surface.

use crate::error::{Result, SceneError};
use crate::style::ResolvedStyle;
use crate::types::Color;
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;
use tiny_skia::{FillRule, Mask, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform};
use tracing::debug;

/// A 2D drawing target with a save/restore state stack.
pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);

    fn translate(&mut self, dx: f32, dy: f32);
    /// Rotates by `radians` around the current origin.
    fn rotate(&mut self, radians: f32);
    fn scale(&mut self, sx: f32, sy: f32);

    fn global_alpha(&self) -> f32;
    fn set_global_alpha(&mut self, alpha: f32);

    /// Intersects the clip with `path` in current coordinates.
    fn clip_path(&mut self, path: &Path);

    fn fill_path(&mut self, path: &Path, style: &ResolvedStyle);
    fn stroke_path(&mut self, path: &Path, style: &ResolvedStyle, width: f32);

    fn fill_rect(&mut self, width: f32, height: f32, style: &ResolvedStyle) {
        if let Some(rect) = Rect::from_xywh(0.0, 0.0, width, height) {
            self.fill_path(&PathBuilder::from_rect(rect), style);
        }
    }

    /// Resets the state stack and paints the whole surface with `color`.
    fn clear(&mut self, color: Color);
}

/// Size and background of a raster surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
    #[serde(deserialize_with = "crate::schema::deserialize_color")]
    pub background: Color,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Color::TRANSPARENT,
        }
    }
}

#[derive(Clone)]
struct State {
    transform: Transform,
    alpha: f32,
    clip: Option<Mask>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            alpha: 1.0,
            clip: None,
        }
    }
}

/// A `Surface` that rasterizes into a tiny-skia pixmap.
pub struct PixmapSurface {
    pixmap: Pixmap,
    state: State,
    stack: Vec<State>,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height)
            .ok_or(SceneError::SurfaceAllocation { width, height })?;
        Ok(Self {
            pixmap,
            state: State::default(),
            stack: Vec::new(),
        })
    }

    pub fn from_config(config: &SurfaceConfig) -> Result<Self> {
        let mut surface = Self::new(config.width, config.height)?;
        surface.clear(config.background);
        Ok(surface)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Premultiplied RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let p = self.pixmap.pixel(x, y)?;
        Some([p.red(), p.green(), p.blue(), p.alpha()])
    }

    /// Current depth of the save/restore stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| SceneError::Encode(e.to_string()))
    }

    pub fn save_png(&self, path: impl AsRef<FsPath>) -> Result<()> {
        self.pixmap
            .save_png(path)
            .map_err(|e| SceneError::Encode(e.to_string()))
    }

    fn paint_for(&self, style: &ResolvedStyle) -> Option<Paint<'static>> {
        let mut paint = Paint::default();
        paint.anti_alias = true;
        match style {
            ResolvedStyle::Color(color) => {
                let mut color = color.to_skia();
                color.apply_opacity(self.state.alpha);
                paint.set_color(color);
            }
            ResolvedStyle::Gradient(builder) => {
                let Some(mut shader) = builder.shader() else {
                    debug!("skipping unresolvable gradient");
                    return None;
                };
                shader.apply_opacity(self.state.alpha);
                paint.shader = shader;
            }
        }
        Some(paint)
    }
}

impl Surface for PixmapSurface {
    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.state.transform = self.state.transform.pre_translate(dx, dy);
    }

    fn rotate(&mut self, radians: f32) {
        self.state.transform = self
            .state
            .transform
            .pre_concat(Transform::from_rotate(radians.to_degrees()));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform = self.state.transform.pre_scale(sx, sy);
    }

    fn global_alpha(&self) -> f32 {
        self.state.alpha
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn clip_path(&mut self, path: &Path) {
        let transform = self.state.transform;
        match &mut self.state.clip {
            Some(mask) => mask.intersect_path(path, FillRule::Winding, true, transform),
            None => {
                let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
                    return;
                };
                mask.fill_path(path, FillRule::Winding, true, transform);
                self.state.clip = Some(mask);
            }
        }
    }

    fn fill_path(&mut self, path: &Path, style: &ResolvedStyle) {
        let Some(paint) = self.paint_for(style) else {
            return;
        };
        self.pixmap.fill_path(
            path,
            &paint,
            FillRule::Winding,
            self.state.transform,
            self.state.clip.as_ref(),
        );
    }

    fn stroke_path(&mut self, path: &Path, style: &ResolvedStyle, width: f32) {
        let Some(paint) = self.paint_for(style) else {
            return;
        };
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            path,
            &paint,
            &stroke,
            self.state.transform,
            self.state.clip.as_ref(),
        );
    }

    fn clear(&mut self, color: Color) {
        self.stack.clear();
        self.state = State::default();
        self.pixmap.fill(color.to_skia());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_surface_is_an_error() {
        let err = PixmapSurface::new(0, 10).err().unwrap();
        assert!(matches!(err, SceneError::SurfaceAllocation { width: 0, height: 10 }));
    }

    #[test]
    fn save_restore_round_trips_state() {
        let mut surface = PixmapSurface::new(8, 8).unwrap();
        surface.save();
        surface.set_global_alpha(0.25);
        surface.translate(3.0, 3.0);
        assert_eq!(surface.depth(), 1);
        surface.restore();
        assert_eq!(surface.global_alpha(), 1.0);
        assert_eq!(surface.depth(), 0);
        // Unbalanced restore is ignored.
        surface.restore();
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn fill_rect_respects_translation() {
        let mut surface = PixmapSurface::new(10, 10).unwrap();
        surface.translate(5.0, 5.0);
        surface.fill_rect(5.0, 5.0, &ResolvedStyle::Color(Color::BLACK));
        assert_eq!(surface.pixel(7, 7), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(2, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn clip_limits_fills() {
        let mut surface = PixmapSurface::new(10, 10).unwrap();
        let clip = PathBuilder::from_rect(Rect::from_xywh(0.0, 0.0, 4.0, 4.0).unwrap());
        surface.clip_path(&clip);
        surface.fill_rect(10.0, 10.0, &ResolvedStyle::Color(Color::WHITE));
        assert_eq!(surface.pixel(1, 1), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(8, 8), Some([0, 0, 0, 0]));
    }

    #[test]
    fn global_alpha_scales_color() {
        let mut surface = PixmapSurface::new(4, 4).unwrap();
        surface.set_global_alpha(0.5);
        surface.fill_rect(4.0, 4.0, &ResolvedStyle::Color(Color::WHITE));
        let [_, _, _, a] = surface.pixel(1, 1).unwrap();
        assert!((i32::from(a) - 128).abs() <= 1);
    }
}
