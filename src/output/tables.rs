use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::providers::gitlab::PipelineStatus;

use super::styling::Tone;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn label_cell(label: &str) -> Cell {
    Cell::new(label).fg(TableColor::Cyan)
}

/// GitLab's own text for the status, `-` when the response had none.
pub fn status_cell(status: &PipelineStatus) -> Cell {
    let text = match status.as_str() {
        "" => "-",
        raw => raw,
    };
    let cell = Cell::new(text);
    match Tone::of(status).table_color() {
        Some(color) => cell.fg(color),
        None => cell,
    }
}

pub fn duration_cell(seconds: Option<f64>) -> Cell {
    match seconds {
        Some(seconds) => Cell::new(format!("{:.1}min", seconds / 60.0)),
        None => Cell::new("-"),
    }
}
