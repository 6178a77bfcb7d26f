//! Frame-time convention for animation sampling
//!
//! Frames are always counted at 60 per second, whatever rate the source
//! document was authored at. Document time is expressed in seconds.

use serde::{Deserialize, Serialize};

/// Frames per second used for every frame number in the pipeline
pub const FRAMES_PER_SECOND: f64 = 60.0;

/// Convert a frame number to document time in seconds
pub fn frame_to_time(frame: f32) -> f64 {
    f64::from(frame) / FRAMES_PER_SECOND
}

/// Convert document time in seconds to a frame number
pub fn time_to_frame(time: f64) -> f32 {
    (time * FRAMES_PER_SECOND) as f32
}

/// Inclusive frame range of an animation clip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRange {
    pub start: f32,
    pub end: f32,
}

impl FrameRange {
    /// Build a range from a clip's import offset and local time span.
    ///
    /// Returns `None` when the span is reversed or not finite.
    pub fn from_time_span(import_offset: f64, start: f64, stop: f64) -> Option<Self> {
        let start = time_to_frame(import_offset + start);
        let end = time_to_frame(import_offset + stop);
        if !start.is_finite() || !end.is_finite() || start > end {
            return None;
        }
        Some(Self { start, end })
    }

    /// Number of frames between start and end
    pub fn duration(&self) -> f32 {
        self.end - self.start
    }

    /// Check if a frame lies inside the range
    pub fn contains(&self, frame: f32) -> bool {
        frame >= self.start && frame <= self.end
    }

    /// Clamp a frame into the range
    pub fn clamp(&self, frame: f32) -> f32 {
        frame.clamp(self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_time_conversion() {
        assert_eq!(frame_to_time(60.0), 1.0);
        assert_eq!(frame_to_time(30.0), 0.5);
        assert_eq!(time_to_frame(2.0), 120.0);
        assert_eq!(time_to_frame(frame_to_time(17.0)), 17.0);
    }

    #[test]
    fn test_fractional_frames_are_not_truncated() {
        assert_eq!(frame_to_time(1.5), 1.5 / 60.0);
    }

    #[test]
    fn test_range_from_time_span() {
        let range = FrameRange::from_time_span(0.5, 0.0, 2.0).unwrap();
        assert_eq!(range.start, 30.0);
        assert_eq!(range.end, 150.0);
        assert_eq!(range.duration(), 120.0);
        assert!(range.contains(30.0));
        assert!(range.contains(150.0));
        assert!(!range.contains(151.0));
        assert_eq!(range.clamp(500.0), 150.0);
    }

    #[test]
    fn test_reversed_span_is_rejected() {
        assert!(FrameRange::from_time_span(0.0, 2.0, 1.0).is_none());
        assert!(FrameRange::from_time_span(f64::NAN, 0.0, 1.0).is_none());
    }

    #[test]
    fn test_empty_span_is_valid() {
        let range = FrameRange::from_time_span(0.0, 1.0, 1.0).unwrap();
        assert_eq!(range.start, range.end);
    }
}
