//! # Animation Module
//!
//! Segment-based timelines driven by an external clock.
//!
//! ## Key Types
//! - `Easing`: the easing curves a segment can use.
//! - `AnimationSegment`: one start/end/duration/easing span.
//! - `AnimationTimeline`: an ordered chain of segments with a lookup cursor.
//! - `AnimatedProperty`: the scene node properties a timeline can drive.

mod easing;
mod segment;
mod timeline;

pub use easing::Easing;
pub use segment::AnimationSegment;
pub use timeline::AnimationTimeline;

use serde::{Deserialize, Serialize};

/// Scene node properties that can be bound to a timeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimatedProperty {
    X,
    Y,
    Rotation,
    Width,
    Height,
    Scale,
    ScaleX,
    ScaleY,
    Alpha,
    ZIndex,
    /// Only meaningful for circles; other nodes ignore it.
    Radius,
}

impl AnimatedProperty {
    pub fn name(self) -> &'static str {
        match self {
            AnimatedProperty::X => "x",
            AnimatedProperty::Y => "y",
            AnimatedProperty::Rotation => "rotation",
            AnimatedProperty::Width => "width",
            AnimatedProperty::Height => "height",
            AnimatedProperty::Scale => "scale",
            AnimatedProperty::ScaleX => "scale_x",
            AnimatedProperty::ScaleY => "scale_y",
            AnimatedProperty::Alpha => "alpha",
            AnimatedProperty::ZIndex => "z_index",
            AnimatedProperty::Radius => "radius",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let property = match name {
            "x" => AnimatedProperty::X,
            "y" => AnimatedProperty::Y,
            "rotation" => AnimatedProperty::Rotation,
            "width" => AnimatedProperty::Width,
            "height" => AnimatedProperty::Height,
            "scale" => AnimatedProperty::Scale,
            "scale_x" => AnimatedProperty::ScaleX,
            "scale_y" => AnimatedProperty::ScaleY,
            "alpha" => AnimatedProperty::Alpha,
            "z_index" => AnimatedProperty::ZIndex,
            "radius" => AnimatedProperty::Radius,
            _ => return None,
        };
        Some(property)
    }
}
