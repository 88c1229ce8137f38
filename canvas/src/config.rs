//! Editor tuning knobs.
//!
//! Every value defaults to the matching constant in [`crate::consts`]. Hosts
//! may override them (the `deckdraw` binary layers environment variables on
//! top) before constructing an [`crate::engine::EngineCore`].

use serde::{Deserialize, Serialize};

use crate::consts::{
    AUTO_FIT_CAP, DEFAULT_PIXELS_PER_FOOT, DUPLICATE_OFFSET, GRID_PITCH, HISTORY_LIMIT, MIN_ENTITY_SIZE,
    VIEWPORT_PADDING_PX,
};

/// Per-session editor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid pitch for drag snapping; `0` disables snapping.
    pub grid_pitch: f64,
    /// Resize floor for width and height.
    pub min_size: f64,
    /// Offset applied to duplicates on both axes.
    pub duplicate_offset: f64,
    /// Snapshot bound for the history.
    pub history_limit: usize,
    /// Base feet-to-pixel conversion.
    pub pixels_per_foot: f64,
    /// Upper cap for the auto-fit multiplier.
    pub auto_fit_cap: f64,
    /// Padding kept clear around an auto-fitted diagram.
    pub viewport_padding: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_pitch: GRID_PITCH,
            min_size: MIN_ENTITY_SIZE,
            duplicate_offset: DUPLICATE_OFFSET,
            history_limit: HISTORY_LIMIT,
            pixels_per_foot: DEFAULT_PIXELS_PER_FOOT,
            auto_fit_cap: AUTO_FIT_CAP,
            viewport_padding: VIEWPORT_PADDING_PX,
        }
    }
}
