//! Keyframe record and interpolation mode.

use serde::{Deserialize, Serialize};

/// Interpolation between a key and the one after it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyFunction {
    /// Hold the left key's value until the next key.
    Steep,
    #[default]
    Linear,
    /// Catmull-Rom through the neighbours; ends are clamped.
    Spline,
    /// Catmull-Rom treating the key list as a cycle.
    ClosedSpline,
}

/// One (frame, value, function) sample of a track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe<T> {
    pub frame: i32,
    pub value: T,
    #[serde(default)]
    pub function: KeyFunction,
}

impl<T> Keyframe<T> {
    pub fn new(frame: i32, value: T, function: KeyFunction) -> Self {
        Self {
            frame,
            value,
            function,
        }
    }
}
