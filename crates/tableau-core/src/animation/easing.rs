use keyframe::EasingFunction;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Easing curves available to timeline segments.
///
/// Every curve maps `0.0 -> 0.0` and `1.0 -> 1.0`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    /// `t²`
    EaseIn,
    /// `t(2 - t)`
    EaseOut,
    /// Piecewise quadratic, symmetric around `0.5`.
    EaseInOutQuad,
    /// `1 - cos(πt/2)`
    EaseInSine,
    /// `sin(πt/2)`
    EaseOutSine,
}

impl Easing {
    /// Maps normalized time to normalized progress.
    pub fn leap(self, norm: f64) -> f64 {
        match self {
            Easing::Linear => norm,
            Easing::EaseIn => norm * norm,
            Easing::EaseOut => norm * (2.0 - norm),
            Easing::EaseInOutQuad => {
                if norm < 0.5 {
                    norm * norm * 2.0
                } else {
                    0.5 + (norm - 0.5) * (1.5 - norm) * 2.0
                }
            }
            Easing::EaseInSine => 1.0 - (PI * norm / 2.0).cos(),
            Easing::EaseOutSine => (PI * norm / 2.0).sin(),
        }
    }

    /// Parses the names used by scene descriptions.
    pub fn from_name(name: &str) -> Option<Self> {
        let easing = match name {
            "linear" | "none" => Easing::Linear,
            "ease_in" | "in" | "in_quad" => Easing::EaseIn,
            "ease_out" | "out" | "out_quad" => Easing::EaseOut,
            "ease_in_out_quad" | "in_out_quad" => Easing::EaseInOutQuad,
            "ease_in_sine" | "in_sine" => Easing::EaseInSine,
            "ease_out_sine" | "out_sine" => Easing::EaseOutSine,
            _ => return None,
        };
        Some(easing)
    }

    pub const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOutQuad,
        Easing::EaseInSine,
        Easing::EaseOutSine,
    ];
}

impl EasingFunction for Easing {
    fn y(&self, x: f64) -> f64 {
        self.leap(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_curve_hits_both_ends() {
        for easing in Easing::ALL {
            assert!(easing.leap(0.0).abs() < 1e-12, "{easing:?} at 0");
            assert!((easing.leap(1.0) - 1.0).abs() < 1e-12, "{easing:?} at 1");
        }
    }

    #[test]
    fn in_out_quad_is_continuous_at_midpoint() {
        let e = Easing::EaseInOutQuad;
        assert!((e.leap(0.5) - 0.5).abs() < 1e-12);
        assert!((e.leap(0.499_999) - e.leap(0.500_001)).abs() < 1e-5);
        assert!((e.leap(0.25) - 0.125).abs() < 1e-12);
        assert!((e.leap(0.75) - 0.875).abs() < 1e-12);
    }

    #[test]
    fn keyframe_trait_matches_leap() {
        let e = Easing::EaseOutSine;
        assert_eq!(EasingFunction::y(&e, 0.3), e.leap(0.3));
    }

    #[test]
    fn names_round_trip_through_serde() {
        let json = serde_json::to_string(&Easing::EaseInSine).unwrap();
        assert_eq!(json, "\"ease_in_sine\"");
        assert_eq!(Easing::from_name("in_out_quad"), Some(Easing::EaseInOutQuad));
        assert_eq!(Easing::from_name("bounce"), None);
    }
}
