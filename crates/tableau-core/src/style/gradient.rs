use crate::types::Color;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tiny_skia::{GradientStop, LinearGradient, Point, RadialGradient, Shader, SpreadMode, Transform};

/// A color at a position in `0.0..=1.0` along a gradient.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f32,
    pub color: Color,
}

/// Geometry of a gradient, in the local coordinates of the node it fills.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GradientKind {
    Linear { start: [f32; 2], end: [f32; 2] },
    Radial { center: [f32; 2], radius: f32 },
}

/// A mutable gradient description.
///
/// Edits mark the gradient dirty; `builder` hands out a cached immutable
/// `GradientBuilder` until the next edit.
#[derive(Clone, Debug)]
pub struct Gradient {
    kind: GradientKind,
    stops: Vec<ColorStop>,
    frozen_stops: Option<Arc<[ColorStop]>>,
    builder: Option<Arc<GradientBuilder>>,
}

impl Gradient {
    pub fn new(kind: GradientKind, stops: Vec<ColorStop>) -> Self {
        Self {
            kind,
            stops,
            frozen_stops: None,
            builder: None,
        }
    }

    pub fn linear(start: [f32; 2], end: [f32; 2]) -> Self {
        Self::new(GradientKind::Linear { start, end }, Vec::new())
    }

    pub fn radial(center: [f32; 2], radius: f32) -> Self {
        Self::new(GradientKind::Radial { center, radius }, Vec::new())
    }

    pub fn kind(&self) -> GradientKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: GradientKind) {
        if self.kind == kind {
            return;
        }
        self.kind = kind;
        self.builder = None;
    }

    pub fn add_color_stop(&mut self, position: f32, color: Color) -> &mut Self {
        self.stops.push(ColorStop { position, color });
        self.invalidate_stops();
        self
    }

    pub fn clear_color_stops(&mut self) {
        self.stops.clear();
        self.invalidate_stops();
    }

    /// Read-only copy of the stops, shared until the stops change.
    pub fn color_stops(&mut self) -> Arc<[ColorStop]> {
        self.frozen_stops
            .get_or_insert_with(|| Arc::from(self.stops.as_slice()))
            .clone()
    }

    /// The immutable builder for the current state.
    pub fn builder(&mut self) -> Arc<GradientBuilder> {
        if let Some(builder) = &self.builder {
            return builder.clone();
        }
        let builder = Arc::new(GradientBuilder::new(self.kind, self.color_stops()));
        self.builder = Some(builder.clone());
        builder
    }

    fn invalidate_stops(&mut self) {
        self.frozen_stops = None;
        self.builder = None;
    }
}

impl PartialEq for Gradient {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.stops == other.stops
    }
}

/// Immutable gradient snapshot that resolves to a shader on demand.
#[derive(Debug)]
pub struct GradientBuilder {
    kind: GradientKind,
    stops: Arc<[ColorStop]>,
    shader: OnceLock<Option<Shader<'static>>>,
}

impl GradientBuilder {
    pub fn new(kind: GradientKind, stops: Arc<[ColorStop]>) -> Self {
        Self {
            kind,
            stops,
            shader: OnceLock::new(),
        }
    }

    pub fn kind(&self) -> GradientKind {
        self.kind
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// The shader for this gradient, created once. `None` when the gradient
    /// cannot be drawn (for example, it has no stops).
    pub fn shader(&self) -> Option<Shader<'static>> {
        self.shader.get_or_init(|| self.create_shader()).clone()
    }

    fn create_shader(&self) -> Option<Shader<'static>> {
        let stops: Vec<GradientStop> = self
            .stops
            .iter()
            .map(|s| GradientStop::new(s.position, s.color.to_skia()))
            .collect();

        match self.kind {
            GradientKind::Linear { start, end } => LinearGradient::new(
                Point::from_xy(start[0], start[1]),
                Point::from_xy(end[0], end[1]),
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            ),
            GradientKind::Radial { center, radius } => {
                let center = Point::from_xy(center[0], center[1]);
                RadialGradient::new(
                    center,
                    center,
                    radius,
                    stops,
                    SpreadMode::Pad,
                    Transform::identity(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_is_cached_until_edit() {
        let mut gradient = Gradient::linear([0.0, 0.0], [10.0, 0.0]);
        gradient
            .add_color_stop(0.0, Color::BLACK)
            .add_color_stop(1.0, Color::WHITE);

        let a = gradient.builder();
        let b = gradient.builder();
        assert!(Arc::ptr_eq(&a, &b));

        gradient.add_color_stop(0.5, Color::TRANSPARENT);
        let c = gradient.builder();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(c.stops().len(), 3);
    }

    #[test]
    fn stops_are_shared_until_changed() {
        let mut gradient = Gradient::radial([5.0, 5.0], 5.0);
        gradient.add_color_stop(0.0, Color::WHITE);
        let a = gradient.color_stops();
        let b = gradient.color_stops();
        assert!(Arc::ptr_eq(&a, &b));
        gradient.clear_color_stops();
        assert!(gradient.color_stops().is_empty());
    }

    #[test]
    fn empty_gradient_has_no_shader() {
        let mut gradient = Gradient::linear([0.0, 0.0], [1.0, 1.0]);
        assert!(gradient.builder().shader().is_none());

        gradient
            .add_color_stop(0.0, Color::BLACK)
            .add_color_stop(1.0, Color::WHITE);
        assert!(gradient.builder().shader().is_some());
    }

    #[test]
    fn equality_ignores_caches() {
        let mut a = Gradient::linear([0.0, 0.0], [1.0, 0.0]);
        a.add_color_stop(0.0, Color::BLACK);
        let _ = a.builder();
        let mut b = Gradient::linear([0.0, 0.0], [1.0, 0.0]);
        b.add_color_stop(0.0, Color::BLACK);
        assert_eq!(a, b);
    }
}
