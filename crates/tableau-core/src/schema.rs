//! # Scene Descriptions
//!
//! A JSON format for whole scenes: surface settings, a tree of objects and
//! the timelines driving them.
//!
//! ```json
//! {
//!   "surface": { "width": 320, "height": 240, "background": "#202020" },
//!   "root": {
//!     "kind": "container", "width": 320, "height": 240,
//!     "children": [{
//!       "kind": "circle", "radius": 20, "anchor": "centre", "origin": "centre",
//!       "fill": "#ff8800",
//!       "animations": [{
//!         "property": "x",
//!         "segments": [{ "op": "tween", "to": 100, "duration": 1000, "easing": "ease_out" }]
//!       }]
//!     }]
//!   }
//! }
//! ```

use crate::animation::{AnimatedProperty, AnimationTimeline, Easing};
use crate::error::{Result, SceneError};
use crate::scene::{NodeKind, ObjectOptions, SceneGraph};
use crate::style::{ColorStop, Gradient, GradientKind, Style};
use crate::surface::SurfaceConfig;
use crate::types::{Color, NodeId};
use crate::units;
use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub surface: SurfaceConfig,
    /// Milliseconds. Defaults to the longest timeline in the scene.
    #[serde(default)]
    pub duration: Option<f64>,
    pub root: ObjectDescription,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    #[default]
    Plain,
    Container,
    Rectangle,
    Circle,
}

#[derive(Debug, Deserialize)]
pub struct ObjectDescription {
    #[serde(default)]
    pub kind: ObjectKind,
    /// Circles only.
    #[serde(default)]
    pub radius: Option<f32>,
    #[serde(flatten)]
    pub options: ObjectOptions,
    #[serde(default)]
    pub animations: Vec<AnimationDescription>,
    /// Containers only.
    #[serde(default)]
    pub children: Vec<ObjectDescription>,
}

#[derive(Debug, Deserialize)]
pub struct AnimationDescription {
    pub property: AnimatedProperty,
    /// Name of a value mapper from `units` (`direct`, `degrees`, `turns`).
    #[serde(default)]
    pub mapper: Option<String>,
    /// Starting value; defaults to the property's current value.
    #[serde(default)]
    pub base: Option<f64>,
    #[serde(default)]
    pub segments: Vec<SegmentDescription>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SegmentDescription {
    Tween {
        to: f64,
        duration: f64,
        #[serde(default)]
        easing: Easing,
    },
    Delay {
        duration: f64,
    },
    Set {
        value: f64,
    },
    Jump {
        time: f64,
    },
}

/// A scene graph built from a description.
#[derive(Debug)]
pub struct LoadedScene {
    pub graph: SceneGraph,
    pub root: NodeId,
    pub surface: SurfaceConfig,
    /// Milliseconds.
    pub duration: f64,
}

impl SceneDescription {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn build(self) -> Result<LoadedScene> {
        let mut graph = SceneGraph::new();
        let mut longest = 0.0f64;
        let root = build_object(&mut graph, self.root, &mut longest)?;
        Ok(LoadedScene {
            graph,
            root,
            surface: self.surface,
            duration: self.duration.unwrap_or(longest),
        })
    }
}

fn build_object(
    graph: &mut SceneGraph,
    description: ObjectDescription,
    longest: &mut f64,
) -> Result<NodeId> {
    let ObjectDescription {
        kind,
        radius,
        options,
        animations,
        children,
    } = description;

    if radius.is_some() && kind != ObjectKind::Circle {
        return Err(SceneError::Description(format!(
            "radius is only valid on circles, not {kind:?}"
        )));
    }
    if !children.is_empty() && kind != ObjectKind::Container {
        return Err(SceneError::Description(format!(
            "{kind:?} objects cannot have children"
        )));
    }

    let node_kind = match kind {
        ObjectKind::Plain => NodeKind::Plain,
        ObjectKind::Container => NodeKind::container(),
        ObjectKind::Rectangle => NodeKind::shape(crate::scene::Rectangle),
        ObjectKind::Circle => NodeKind::shape(crate::scene::Circle),
    };
    let id = graph.add_object(options, node_kind);
    if let Some(radius) = radius {
        graph.node_mut(id)?.set_radius(radius);
    }

    for animation in animations {
        let total = build_animation(graph, id, animation)?;
        *longest = longest.max(total);
    }
    for child in children {
        let child = build_object(graph, child, longest)?;
        graph.add_child(id, child)?;
    }
    Ok(id)
}

fn build_animation(
    graph: &mut SceneGraph,
    id: NodeId,
    description: AnimationDescription,
) -> Result<f64> {
    let mapper: fn(f64) -> f64 = match description.mapper.as_deref() {
        None => units::direct,
        Some(name) => units::mapper_by_name(name)
            .ok_or_else(|| SceneError::Description(format!("unknown mapper `{name}`")))?,
    };
    let timeline = match description.base {
        Some(base) => graph.insert_animation(
            id,
            description.property,
            AnimationTimeline::new(base, mapper),
        )?,
        None => graph.register_animation_for(id, description.property, mapper)?,
    };

    for segment in description.segments {
        match segment {
            SegmentDescription::Tween {
                to,
                duration,
                easing,
            } => {
                timeline.tween(to, duration, easing);
            }
            SegmentDescription::Delay { duration } => {
                timeline.delay(duration);
            }
            SegmentDescription::Set { value } => {
                timeline.set(value);
            }
            SegmentDescription::Jump { time } => {
                timeline.jump(time)?;
            }
        }
    }
    Ok(timeline.total_duration())
}

fn parse_color<E: serde::de::Error>(hex: &str) -> std::result::Result<Color, E> {
    Color::from_hex(hex).ok_or_else(|| E::custom(format!("invalid color `{hex}`")))
}

/// Deserializes a color given as a hex string or as `{r, g, b, a}`.
pub(crate) fn deserialize_color<'de, D>(deserializer: D) -> std::result::Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Hex(String),
        Rgba(Color),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Hex(hex) => parse_color(&hex),
        Repr::Rgba(color) => Ok(color),
    }
}

/// Deserializes an optional style: a hex color, or a gradient with stops.
pub(crate) fn deserialize_style<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Style>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Stop {
        position: f32,
        color: String,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Hex(String),
        Gradient { gradient: GradientKind, stops: Vec<Stop> },
    }

    let Some(repr) = Option::<Repr>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let style = match repr {
        Repr::Hex(hex) => Style::Color(parse_color(&hex)?),
        Repr::Gradient { gradient, stops } => {
            let stops = stops
                .into_iter()
                .map(|stop| {
                    Ok(ColorStop {
                        position: stop.position,
                        color: parse_color(&stop.color)?,
                    })
                })
                .collect::<std::result::Result<Vec<_>, D::Error>>()?;
            Style::Gradient(Gradient::new(gradient, stops))
        }
    };
    Ok(Some(style))
}
