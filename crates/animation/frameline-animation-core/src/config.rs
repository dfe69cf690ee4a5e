//! Playback configuration.

use serde::{Deserialize, Serialize};

/// Knobs shared by every animation on a node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Jump-marker redirections honored within a single `advance`. Further
    /// crossings in the same call are left for the next tick.
    pub max_jumps_per_advance: u32,

    /// Apply an animation's animators immediately after a successful run so
    /// properties reflect the start marker before the next tick.
    pub apply_on_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_jumps_per_advance: 8,
            apply_on_run: true,
        }
    }
}
