use super::easing::Easing;

/// One interpolation span of a timeline.
///
/// `start_value` is assigned by the owning timeline when the segment is
/// appended. Only `duration` changes afterwards, when the timeline jumps.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationSegment {
    pub(crate) start_value: f64,
    pub(crate) end_value: f64,
    pub(crate) duration: f64,
    pub(crate) easing: Easing,
}

impl AnimationSegment {
    /// Creates a segment starting at `0.0`. Negative durations are clamped to zero.
    pub fn new(end_value: f64, duration: f64, easing: Easing) -> Self {
        Self {
            start_value: 0.0,
            end_value,
            duration: duration.max(0.0),
            easing,
        }
    }

    pub fn start_value(&self) -> f64 {
        self.start_value
    }

    pub fn end_value(&self) -> f64 {
        self.end_value
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Interpolated value at local time `t`.
    ///
    /// Clamps below `0` and above `duration`. A zero-length segment resolves to
    /// its end value without dividing.
    pub fn value(&self, t: f64) -> f64 {
        let norm = if self.duration == 0.0 {
            1.0
        } else {
            (t / self.duration).clamp(0.0, 1.0)
        };
        let progress = self.easing.leap(norm);
        self.start_value + (self.end_value - self.start_value) * progress
    }
}
