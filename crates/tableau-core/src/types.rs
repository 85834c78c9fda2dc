//! # Shared Types
//!
//! Small value types used across the scene graph.
//!
//! ## Key Types
//! - `NodeId`: index of a scene node in the `SceneGraph` arena.
//! - `Vector2`: x/y pair with a frozen (read-only) variant, used for anchors
//!   and origins.
//! - `Anchor`: the nine named positions of a 3x3 grid over a rectangle.
//! - `Color`: straight-alpha RGBA color in `0.0..=1.0`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::error;

/// Index of a node inside the `SceneGraph` arena.
pub type NodeId = usize;

/// An x/y pair.
///
/// A frozen vector refuses mutation. Equality is structural and ignores the
/// frozen flag.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Vector2 {
    x: f32,
    y: f32,
    #[serde(skip)]
    frozen: bool,
}

impl Vector2 {
    /// Creates an editable vector.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, frozen: false }
    }

    /// Creates a frozen vector.
    pub const fn frozen(x: f32, y: f32) -> Self {
        Self { x, y, frozen: true }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Sets x. Returns `false` (and leaves the vector untouched) when frozen.
    pub fn set_x(&mut self, x: f32) -> bool {
        if self.frozen {
            error!("attempted to mutate a frozen Vector2");
            return false;
        }
        self.x = x;
        true
    }

    /// Sets y. Returns `false` (and leaves the vector untouched) when frozen.
    pub fn set_y(&mut self, y: f32) -> bool {
        if self.frozen {
            error!("attempted to mutate a frozen Vector2");
            return false;
        }
        self.y = y;
        true
    }

    /// Returns the read-only version of this vector.
    pub fn freeze(self) -> Self {
        Self {
            frozen: true,
            ..self
        }
    }
}

impl PartialEq for Vector2 {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// Named positions on a rectangle, expressed as fractions of its size.
pub struct Anchor;

impl Anchor {
    pub const TOP_LEFT: Vector2 = Vector2::frozen(0.0, 0.0);
    pub const TOP: Vector2 = Vector2::frozen(0.5, 0.0);
    pub const TOP_RIGHT: Vector2 = Vector2::frozen(1.0, 0.0);
    pub const LEFT: Vector2 = Vector2::frozen(0.0, 0.5);
    pub const CENTRE: Vector2 = Vector2::frozen(0.5, 0.5);
    pub const RIGHT: Vector2 = Vector2::frozen(1.0, 0.5);
    pub const BOTTOM_LEFT: Vector2 = Vector2::frozen(0.0, 1.0);
    pub const BOTTOM: Vector2 = Vector2::frozen(0.5, 1.0);
    pub const BOTTOM_RIGHT: Vector2 = Vector2::frozen(1.0, 1.0);

    /// Looks up an anchor by its snake_case name (`"top_left"`, `"centre"`, ...).
    pub fn by_name(name: &str) -> Option<Vector2> {
        let anchor = match name {
            "top_left" => Self::TOP_LEFT,
            "top" => Self::TOP,
            "top_right" => Self::TOP_RIGHT,
            "left" => Self::LEFT,
            "centre" | "center" => Self::CENTRE,
            "right" => Self::RIGHT,
            "bottom_left" => Self::BOTTOM_LEFT,
            "bottom" => Self::BOTTOM,
            "bottom_right" => Self::BOTTOM_RIGHT,
            _ => return None,
        };
        Some(anchor)
    }
}

/// Deserializes an anchor given either by name or as an `{x, y}` point.
/// The result is frozen.
pub(crate) fn deserialize_anchor<'de, D>(deserializer: D) -> Result<Vector2, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Named(String),
        Point { x: f32, y: f32 },
    }

    match Repr::deserialize(deserializer)? {
        Repr::Named(name) => Anchor::by_name(&name)
            .ok_or_else(|| D::Error::custom(format!("unknown anchor `{name}`"))),
        Repr::Point { x, y } => Ok(Vector2::frozen(x, y)),
    }
}

/// Straight-alpha RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);

        match digits.len() {
            3 => {
                let mut out = [0.0f32; 3];
                for (i, c) in digits.chars().enumerate() {
                    let v = c.to_digit(16)? as f32;
                    out[i] = (v * 17.0) / 255.0;
                }
                Some(Self::rgba(out[0], out[1], out[2], 1.0))
            }
            6 | 8 => {
                let r = channel(digits.get(0..2)?)?;
                let g = channel(digits.get(2..4)?)?;
                let b = channel(digits.get(4..6)?)?;
                let a = if digits.len() == 8 {
                    channel(digits.get(6..8)?)?
                } else {
                    1.0
                };
                Some(Self::rgba(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Converts to a tiny-skia color, clamping each channel.
    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
        .unwrap_or(tiny_skia::Color::BLACK)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frozen_vector_rejects_mutation() {
        let mut v = Anchor::CENTRE;
        assert!(!v.set_x(3.0));
        assert_eq!(v.x(), 0.5);

        let mut editable = Vector2::new(1.0, 2.0);
        assert!(editable.set_y(5.0));
        assert_eq!(editable.y(), 5.0);
        assert!(editable.freeze().is_frozen());
    }

    #[test]
    fn equality_ignores_frozen_flag() {
        assert_eq!(Vector2::new(1.0, 0.0), Anchor::TOP_RIGHT);
        assert_ne!(Vector2::new(1.0, 0.5), Anchor::TOP_RIGHT);
    }

    #[test]
    fn anchors_by_name() {
        assert_eq!(Anchor::by_name("bottom_right"), Some(Anchor::BOTTOM_RIGHT));
        assert_eq!(Anchor::by_name("center"), Some(Anchor::CENTRE));
        assert_eq!(Anchor::by_name("middle"), None);
    }

    #[test]
    fn anchors_deserialize_from_names_and_points() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(deserialize_with = "deserialize_anchor")]
            anchor: Vector2,
        }

        let named: Holder = serde_json::from_str(r#"{"anchor": "bottom"}"#).unwrap();
        assert_eq!(named.anchor, Anchor::BOTTOM);
        let point: Holder = serde_json::from_str(r#"{"anchor": {"x": 0.25, "y": 1}}"#).unwrap();
        assert_eq!(point.anchor, Vector2::new(0.25, 1.0));
        assert!(point.anchor.is_frozen());
        assert!(serde_json::from_str::<Holder>(r#"{"anchor": "middle"}"#).is_err());
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(Color::from_hex("#000"), Some(Color::BLACK));
        assert_eq!(Color::from_hex("#ffffff"), Some(Color::WHITE));
        let c = Color::from_hex("#ff000080").unwrap();
        assert_eq!(c.r, 1.0);
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(Color::from_hex("fff"), None);
        assert_eq!(Color::from_hex("#12345"), None);
    }
}
