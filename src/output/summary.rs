use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::providers::gitlab::{DryRunPreview, PipelineResult};

use super::styling::{dim, heading, link, Tone};
use super::tables::{create_table, duration_cell, label_cell, status_cell};

/// Renders a created pipeline as a two-column table.
pub fn render_pipeline(pipeline: &PipelineResult) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{} {}",
        Tone::of(&pipeline.status).paint("✓"),
        heading(format!("Pipeline #{} created", pipeline.id))
    );

    let mut table = create_table();
    table.add_row(vec![label_cell("ID"), pipeline.id.to_string().into()]);
    table.add_row(vec![label_cell("Ref"), pipeline.ref_.as_str().into()]);
    table.add_row(vec![label_cell("Status"), status_cell(&pipeline.status)]);
    if !pipeline.detailed_status.text.is_empty() {
        table.add_row(vec![
            label_cell("Detailed status"),
            pipeline.detailed_status.text.as_str().into(),
        ]);
    }
    if !pipeline.sha.is_empty() {
        table.add_row(vec![label_cell("Commit"), pipeline.sha.as_str().into()]);
    }
    table.add_row(vec![label_cell("Created"), format_time(pipeline.created_at).into()]);
    table.add_row(vec![label_cell("Started"), format_time(pipeline.started_at).into()]);
    table.add_row(vec![label_cell("Finished"), format_time(pipeline.finished_at).into()]);
    table.add_row(vec![label_cell("Duration"), duration_cell(pipeline.duration)]);
    let _ = writeln!(output, "{table}");

    if !pipeline.web_url.is_empty() {
        let _ = writeln!(output, "{} {}", dim("→"), link(&pipeline.web_url));
    }

    output
}

/// Renders the request a dry run would have sent.
pub fn render_preview(preview: &DryRunPreview) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{} {}",
        Tone::Busy.paint("•"),
        heading("Dry run, no pipeline was created")
    );
    let _ = writeln!(output, "{} {}", preview.method, preview.url);
    let _ = writeln!(output, "{}", preview.body);
    output
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(
        || "-".to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}
