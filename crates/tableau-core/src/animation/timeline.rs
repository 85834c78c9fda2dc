use super::easing::Easing;
use super::segment::AnimationSegment;
use crate::error::{Result, SceneError};
use std::fmt;

/// Lookup cache for sequential queries.
///
/// While valid, the segment at `active_index` starts at `active_start`, and
/// `active_start <= last_query_time`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Cursor {
    last_query_time: f64,
    active_index: usize,
    active_start: f64,
}

/// An ordered chain of segments queried by absolute elapsed time (ms).
///
/// Each appended segment starts where the previous one ended. Queries use a
/// cached cursor so monotonic playback stays O(1) amortized; anything the
/// cursor cannot answer falls back to a linear scan, which is the source of
/// truth.
///
/// `T` is what the value mapper produces from the raw interpolated number.
pub struct AnimationTimeline<T = f64> {
    segments: Vec<AnimationSegment>,
    base_value: f64,
    total_duration: f64,
    last_value: f64,
    cursor: Cursor,
    mapper: Box<dyn Fn(f64) -> T>,
}

impl AnimationTimeline<f64> {
    /// A timeline whose mapped value is the raw value.
    pub fn direct(base_value: f64) -> Self {
        Self::new(base_value, |v| v)
    }
}

impl<T> AnimationTimeline<T> {
    pub fn new(base_value: f64, mapper: impl Fn(f64) -> T + 'static) -> Self {
        Self {
            segments: Vec::new(),
            base_value,
            total_duration: 0.0,
            last_value: base_value,
            cursor: Cursor::default(),
            mapper: Box::new(mapper),
        }
    }

    pub fn base_value(&self) -> f64 {
        self.base_value
    }

    /// Sum of all segment durations.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn segments(&self) -> &[AnimationSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Appends a segment, chaining its start value to the previous end value.
    pub fn append(&mut self, mut segment: AnimationSegment) -> &mut Self {
        segment.start_value = match self.segments.last() {
            Some(last) => last.end_value,
            None => self.base_value,
        };
        self.total_duration += segment.duration;
        self.last_value = segment.end_value;
        self.segments.push(segment);
        self
    }

    pub fn tween(&mut self, end: f64, duration: f64, easing: Easing) -> &mut Self {
        self.append(AnimationSegment::new(end, duration, easing))
    }

    /// Linear move to `end`.
    pub fn to(&mut self, end: f64, duration: f64) -> &mut Self {
        self.tween(end, duration, Easing::Linear)
    }

    /// Holds the current end value for `duration`.
    pub fn delay(&mut self, duration: f64) -> &mut Self {
        self.tween(self.last_value, duration, Easing::Linear)
    }

    /// Jumps to `value` instantly.
    pub fn set(&mut self, value: f64) -> &mut Self {
        self.tween(value, 0.0, Easing::Linear)
    }

    pub fn ease_in(&mut self, end: f64, duration: f64) -> &mut Self {
        self.tween(end, duration, Easing::EaseIn)
    }

    pub fn ease_out(&mut self, end: f64, duration: f64) -> &mut Self {
        self.tween(end, duration, Easing::EaseOut)
    }

    pub fn ease_in_out_quad(&mut self, end: f64, duration: f64) -> &mut Self {
        self.tween(end, duration, Easing::EaseInOutQuad)
    }

    pub fn ease_in_sine(&mut self, end: f64, duration: f64) -> &mut Self {
        self.tween(end, duration, Easing::EaseInSine)
    }

    pub fn ease_out_sine(&mut self, end: f64, duration: f64) -> &mut Self {
        self.tween(end, duration, Easing::EaseOutSine)
    }

    /// Rewrites the timeline so that it looks as if only `time` ms had been
    /// scheduled: the segment covering `time` is truncated there and every
    /// later segment is dropped. A `time` past the end appends the overflow as
    /// a hold.
    pub fn jump(&mut self, time: f64) -> Result<&mut Self> {
        if !(time >= 0.0) {
            return Err(SceneError::InvalidArgument(format!(
                "jump time must be >= 0, got {time}"
            )));
        }

        let mut remaining = time - self.total_duration;
        if remaining < 0.0 {
            for index in (0..self.segments.len()).rev() {
                remaining += self.segments[index].duration;
                if remaining >= 0.0 {
                    self.truncate_at(index, remaining);
                    return Ok(self);
                }
            }
            // Rounding left a sliver below zero: nothing of the old chain survives.
            self.segments.clear();
            self.total_duration = 0.0;
            self.last_value = self.base_value;
            self.cursor = Cursor::default();
            remaining = time;
        }

        if remaining > 0.0 {
            self.delay(remaining);
        }
        Ok(self)
    }

    fn truncate_at(&mut self, index: usize, duration: f64) {
        self.segments.truncate(index + 1);
        let segment = &mut self.segments[index];
        segment.duration = duration;
        self.last_value = segment.end_value;

        let start: f64 = self.segments[..index].iter().map(|s| s.duration).sum();
        self.total_duration = start + duration;
        self.cursor = Cursor {
            last_query_time: start,
            active_index: index,
            active_start: start,
        };
    }

    /// Raw interpolated value at absolute time `t`.
    pub fn value(&mut self, t: f64) -> f64 {
        let Some(last) = self.segments.last() else {
            return self.base_value;
        };

        if t > self.total_duration {
            let last_start = self.total_duration - last.duration;
            return last.value(t - last_start);
        }

        if t >= self.cursor.last_query_time {
            if let Some(value) = self.sequential_lookup(t) {
                self.cursor.last_query_time = t;
                return value;
            }
        }

        self.scan(t)
    }

    /// Mapped value at absolute time `t`.
    pub fn get(&mut self, t: f64) -> T {
        let value = self.value(t);
        (self.mapper)(value)
    }

    /// Applies the mapper to a raw value.
    pub fn map(&self, value: f64) -> T {
        (self.mapper)(value)
    }

    /// Same segment, then next segment, then restart from the first segment.
    fn sequential_lookup(&mut self, t: f64) -> Option<f64> {
        let Cursor {
            active_index,
            active_start,
            ..
        } = self.cursor;

        let current = self.segments.get(active_index)?;
        if t >= active_start && t < active_start + current.duration {
            return Some(current.value(t - active_start));
        }

        let next_start = active_start + current.duration;
        let next = self.segments.get(active_index + 1)?;
        if t >= next_start && t < next_start + next.duration {
            self.cursor.active_index = active_index + 1;
            self.cursor.active_start = next_start;
            return Some(next.value(t - next_start));
        }

        let first = &self.segments[0];
        if t < first.duration {
            self.cursor.active_index = 0;
            self.cursor.active_start = 0.0;
            return Some(first.value(t));
        }

        None
    }

    fn scan(&mut self, t: f64) -> f64 {
        let mut start = 0.0;
        for (index, segment) in self.segments.iter().enumerate() {
            if t < start + segment.duration {
                self.cursor = Cursor {
                    last_query_time: t,
                    active_index: index,
                    active_start: start,
                };
                return segment.value(t - start);
            }
            start += segment.duration;
        }

        self.segments
            .last()
            .map(|s| s.end_value)
            .unwrap_or(self.last_value)
    }
}

impl<T> fmt::Debug for AnimationTimeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationTimeline")
            .field("base_value", &self.base_value)
            .field("segments", &self.segments.len())
            .field("total_duration", &self.total_duration)
            .finish()
    }
}
