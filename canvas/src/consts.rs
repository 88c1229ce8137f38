//! Shared numeric constants for the canvas crate.

// ── Editing ─────────────────────────────────────────────────────

/// Grid pitch, in canvas units, that dragged positions snap to.
pub const GRID_PITCH: f64 = 20.0;

/// Smallest width or height a resize may produce, in canvas units.
pub const MIN_ENTITY_SIZE: f64 = 20.0;

/// Offset applied on both axes to a duplicated entity.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Maximum number of snapshots the history retains.
pub const HISTORY_LIMIT: usize = 50;

/// Rotation increment in degrees.
pub const ROTATION_STEP_DEG: f64 = 90.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Hit slop in pixels around the resize handle.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Hit slop in pixels for thin strokes (lines, arrows, freehand).
pub const HIT_SLOP_PX: f64 = 6.0;

// ── Scale ───────────────────────────────────────────────────────

/// Default conversion from real-world feet to canvas pixels.
pub const DEFAULT_PIXELS_PER_FOOT: f64 = 20.0;

/// Upper bound on the auto-fit multiplier so tiny decks don't over-zoom.
pub const AUTO_FIT_CAP: f64 = 2.0;

/// Padding kept clear on every side of the viewport when auto-fitting.
pub const VIEWPORT_PADDING_PX: f64 = 40.0;

// ── Stairs ──────────────────────────────────────────────────────

/// Standard riser height used when synthesizing stairs from deck height.
pub const STANDARD_RISE_IN: f64 = 7.5;

/// Riser height of the rise:run pair used for railing-length back-calculation.
pub const RAILING_RISE_IN: f64 = 7.0;

/// Tread run of the rise:run pair used for railing-length back-calculation.
pub const RAILING_RUN_IN: f64 = 10.0;

/// Tread depth for synthesized stairs.
pub const STAIR_RUN_IN: f64 = 10.0;

/// Width of a synthesized stair run.
pub const STAIR_WIDTH_FT: f64 = 4.0;

/// Side length of a drawn post.
pub const POST_SIZE_FT: f64 = 0.5;

// ── Annotations ─────────────────────────────────────────────────

/// Gap between an edge and its dimension line.
pub const DIMENSION_GAP_PX: f64 = 20.0;

/// Half-length of the perpendicular ticks at each end of a dimension line.
pub const DIMENSION_TICK_PX: f64 = 6.0;

/// Arrowhead length in canvas units.
pub const ARROW_SIZE: f64 = 10.0;

/// Arrowhead half-angle in radians (~30°).
pub const ARROW_ANGLE: f64 = std::f64::consts::PI / 6.0;

/// Opacity applied to highlighter strokes.
pub const HIGHLIGHTER_OPACITY: f64 = 0.35;

/// Highlighter strokes are this many times wider than pen strokes.
pub const HIGHLIGHTER_WIDTH_FACTOR: f64 = 4.0;

/// Inner padding of a callout text box.
pub const CALLOUT_PADDING: f64 = 8.0;

/// Default font size in canvas units.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Estimated glyph advance as a fraction of font size, for layout without glyph metrics.
pub const GLYPH_ADVANCE_RATIO: f64 = 0.6;

/// Decimals shown on measurement-tool labels.
pub const MEASUREMENT_PRECISION: usize = 1;

/// Default side count for the polygon tool.
pub const DEFAULT_POLYGON_SIDES: u32 = 6;
