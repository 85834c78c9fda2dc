//! Value mappers for timelines.

use std::f64::consts::PI;

/// Identity mapping.
pub fn direct(value: f64) -> f64 {
    value
}

pub fn degree_to_radian(degree: f64) -> f64 {
    degree * (PI / 180.0)
}

/// Full turns to radians.
pub fn rotation_to_radian(rotation: f64) -> f64 {
    rotation * 2.0 * PI
}

/// Looks up a mapper by the name used in scene descriptions.
pub fn mapper_by_name(name: &str) -> Option<fn(f64) -> f64> {
    match name {
        "direct" => Some(direct),
        "degree_to_radian" | "degrees" => Some(degree_to_radian),
        "rotation_to_radian" | "turns" => Some(rotation_to_radian),
        _ => None,
    }
}
