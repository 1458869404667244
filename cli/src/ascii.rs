//! Plain-text rendering of the board for terminal output.
//!
//! Each cell is three columns wide: ` . ` when empty, ` N ` for an entity of
//! color class `N`, `[N]` when that entity is selected. The roster follows
//! the grid, one player per line in ordinal order. Boards larger than
//! [`MAX_SIDE`] on either axis are cut to their top-left corner.

#[cfg(test)]
#[path = "ascii_test.rs"]
mod ascii_test;

use board::engine::Engine;
use board::geometry::Cell;
use board::surface::Surface;
use wire::EntityStatus;

/// Most rows or columns drawn in one frame.
pub const MAX_SIDE: u32 = 64;

pub fn render<S: Surface>(engine: &Engine<S>) -> String {
    let grid = engine.grid();
    let mut out = String::new();
    if !grid.is_ready() {
        out.push_str("(waiting for board dimensions)\n");
    }
    let (rows, cols) = (grid.rows.min(MAX_SIDE), grid.cols.min(MAX_SIDE));
    for y in 0..rows {
        for x in 0..cols {
            let cell = Cell::new(to_i32(x), to_i32(y));
            out.push_str(&glyph(engine, cell));
        }
        out.push('\n');
    }
    if (rows, cols) != (grid.rows, grid.cols) {
        out.push_str(&format!("(showing {rows}x{cols} of {}x{})\n", grid.rows, grid.cols));
    }
    for line in engine.roster_lines() {
        out.push_str(&line.text);
        out.push('\n');
    }
    out
}

/// One-line summary for logs.
pub fn summary<S: Surface>(engine: &Engine<S>) -> String {
    let grid = engine.grid();
    let selected = engine.entities().iter().filter(|e| e.status == EntityStatus::Selected).count();
    let selected = if selected > 0 { format!(" ({selected} selected)") } else { String::new() };
    format!(
        "{}x{} board, {} entities{selected}, {} players",
        grid.rows,
        grid.cols,
        engine.entity_count(),
        engine.players().len()
    )
}

fn glyph<S: Surface>(engine: &Engine<S>, cell: Cell) -> String {
    match engine.entity_at(cell) {
        None => " . ".to_owned(),
        Some(entity) => {
            let class = char::from_digit(entity.color_class, 10).unwrap_or('?');
            if entity.status == EntityStatus::Selected {
                format!("[{class}]")
            } else {
                format!(" {class} ")
            }
        }
    }
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
