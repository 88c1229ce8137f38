//! Environment overlay for the editor configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use canvas::config::EditorConfig;

/// `EditorConfig` defaults with any `DECKDRAW_*` overrides applied.
/// Unparseable values fall back to the default.
pub(crate) fn editor_config_from_env() -> EditorConfig {
    let d = EditorConfig::default();
    EditorConfig {
        grid_pitch: env_parse("DECKDRAW_GRID_PITCH", d.grid_pitch),
        min_size: env_parse("DECKDRAW_MIN_SIZE", d.min_size),
        duplicate_offset: env_parse("DECKDRAW_DUPLICATE_OFFSET", d.duplicate_offset),
        history_limit: env_parse("DECKDRAW_HISTORY_LIMIT", d.history_limit),
        pixels_per_foot: env_parse("DECKDRAW_PIXELS_PER_FOOT", d.pixels_per_foot),
        auto_fit_cap: env_parse("DECKDRAW_AUTO_FIT_CAP", d.auto_fit_cap),
        viewport_padding: env_parse("DECKDRAW_VIEWPORT_PADDING", d.viewport_padding),
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
