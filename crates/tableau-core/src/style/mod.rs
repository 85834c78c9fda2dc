//! # Styles
//!
//! Fill and stroke values of scene nodes, and their resolved, immutable form
//! carried by snapshot nodes.
//!
//! A `Style` is either a plain color or a mutable `Gradient`. Resolving it
//! yields a `ResolvedStyle`: the raw color, or a shared `GradientBuilder`
//! that turns into a shader when a surface draws with it.

mod gradient;

pub use gradient::{ColorStop, Gradient, GradientBuilder, GradientKind};

use crate::types::Color;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
pub enum Style {
    Color(Color),
    Gradient(Gradient),
}

impl Style {
    pub fn resolve(&mut self) -> ResolvedStyle {
        match self {
            Style::Color(color) => ResolvedStyle::Color(*color),
            Style::Gradient(gradient) => ResolvedStyle::Gradient(gradient.builder()),
        }
    }
}

impl From<Color> for Style {
    fn from(color: Color) -> Self {
        Style::Color(color)
    }
}

impl From<Gradient> for Style {
    fn from(gradient: Gradient) -> Self {
        Style::Gradient(gradient)
    }
}

/// A style frozen into a snapshot node.
#[derive(Clone, Debug)]
pub enum ResolvedStyle {
    Color(Color),
    Gradient(Arc<GradientBuilder>),
}

impl PartialEq for ResolvedStyle {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ResolvedStyle::Color(a), ResolvedStyle::Color(b)) => a == b,
            (ResolvedStyle::Gradient(a), ResolvedStyle::Gradient(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
