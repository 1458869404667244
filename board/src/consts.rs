//! Shared numeric constants for the board crate.

// ── Geometry ────────────────────────────────────────────────────

/// Pixels reserved around the grid before dividing the surface into cells.
pub const FIXED_MARGIN: f64 = 10.0;

/// Inset on every side of a non-selected entity, in pixels.
pub const NORMAL_PADDING: f64 = 10.0;

/// Selected entities are inset by this fraction of the half-cell size.
pub const SELECTED_PADDING_RATIO: f64 = 0.5;

/// Absorbs float error when dividing a pixel coordinate back into a cell index.
pub const CELL_EPSILON: f64 = 1e-9;

// ── Styling ─────────────────────────────────────────────────────

/// Fill colors indexed by an entity's color class.
pub const ENTITY_COLORS: [&str; 5] = ["red", "blue", "green", "gray", "orange"];

/// Fill used when the color class is outside [`ENTITY_COLORS`].
pub const FALLBACK_COLOR: &str = "black";

pub const ENTITY_STROKE: &str = "black";
pub const ENTITY_STROKE_WIDTH: f64 = 2.0;

pub const SELECTED_ALPHA: f64 = 0.5;
pub const NORMAL_ALPHA: f64 = 1.0;

// ── Roster ──────────────────────────────────────────────────────

pub const ROSTER_FONT: &str = "24pt Calibri";
pub const ROSTER_LEFT: f64 = 10.0;
pub const ROSTER_TOP: f64 = 25.0;
pub const ROSTER_LINE_HEIGHT: f64 = 32.0;

// ── Timing ──────────────────────────────────────────────────────

/// Quiet period after the last resize notification before geometry is recomputed.
pub const RESIZE_SETTLE_MS: f64 = 500.0;
