//! Frame/second conversions. Keyframe and marker positions are integer frames
//! at a fixed rate; animation time is kept in seconds.

pub const FRAMES_PER_SECOND: f64 = 30.0;
pub const SECONDS_PER_FRAME: f64 = 1.0 / FRAMES_PER_SECOND;

// Absorbs float error so that frames_to_seconds(n) maps back to n.
const FRAME_EPSILON: f64 = 1e-6;

/// Quantize seconds to the frame whose interval `[n, n + 1)` contains them.
#[inline]
pub fn seconds_to_frames(seconds: f64) -> i32 {
    (seconds * FRAMES_PER_SECOND + FRAME_EPSILON).floor() as i32
}

#[inline]
pub fn frames_to_seconds(frame: i32) -> f64 {
    frame as f64 * SECONDS_PER_FRAME
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_whole_frames() {
        for f in [0, 1, 7, 29, 30, 31, 1000] {
            assert_eq!(seconds_to_frames(frames_to_seconds(f)), f);
        }
    }

    #[test]
    fn quantizes_within_a_frame() {
        assert_eq!(seconds_to_frames(5.5 / 30.0), 5);
        assert_eq!(seconds_to_frames(5.99 / 30.0), 5);
        assert_eq!(seconds_to_frames(-0.5 / 30.0), -1);
    }
}
