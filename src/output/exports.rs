use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::config::OutputFormat;
use crate::providers::gitlab::{DryRunPreview, TriggerOutcome};

use super::summary::{render_pipeline, render_preview};

/// JSON shape of a dry run, so scripted callers can tell it apart from a
/// created pipeline.
#[derive(Serialize)]
struct DryRunReport<'a> {
    executed: bool,
    #[serde(flatten)]
    preview: &'a DryRunPreview,
}

/// Writes the trigger outcome in the requested format.
pub fn export_outcome(
    outcome: &TriggerOutcome,
    format: OutputFormat,
    pretty: bool,
    output: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Summary => {
            let text = match outcome {
                TriggerOutcome::Created(pipeline) => render_pipeline(pipeline),
                TriggerOutcome::NotExecuted(preview) => render_preview(preview),
            };
            write!(output, "{text}")?;
        }
        OutputFormat::Json => {
            let json = match outcome {
                TriggerOutcome::Created(pipeline) => to_json(pipeline, pretty)?,
                TriggerOutcome::NotExecuted(preview) => to_json(
                    &DryRunReport {
                        executed: false,
                        preview,
                    },
                    pretty,
                )?,
            };
            writeln!(output, "{json}")?;
        }
    }
    Ok(())
}

fn to_json(value: &impl Serialize, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::gitlab::{PipelineResult, PipelineStatus};

    fn preview() -> DryRunPreview {
        DryRunPreview {
            method: "POST",
            url: "https://gitlab.com/api/v4/projects/42/pipeline".to_string(),
            body: r#"{"ref":"main","variables":[]}"#.to_string(),
        }
    }

    #[test]
    fn test_export_created_pipeline_as_json() {
        let outcome = TriggerOutcome::Created(PipelineResult {
            id: 287,
            ref_: "main".to_string(),
            status: PipelineStatus::Other("waiting_for_callback".to_string()),
            ..Default::default()
        });
        let mut buffer = Vec::new();

        export_outcome(&outcome, OutputFormat::Json, false, &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["id"], 287);
        assert_eq!(value["ref"], "main");
        assert_eq!(value["status"], "waiting_for_callback");
    }

    #[test]
    fn test_export_dry_run_as_json() {
        let outcome = TriggerOutcome::NotExecuted(preview());
        let mut buffer = Vec::new();

        export_outcome(&outcome, OutputFormat::Json, true, &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["executed"], false);
        assert_eq!(value["method"], "POST");
        assert_eq!(value["url"], "https://gitlab.com/api/v4/projects/42/pipeline");
        assert_eq!(value["body"], r#"{"ref":"main","variables":[]}"#);
    }

    #[test]
    fn test_export_dry_run_as_summary() {
        let outcome = TriggerOutcome::NotExecuted(preview());
        let mut buffer = Vec::new();

        export_outcome(&outcome, OutputFormat::Summary, false, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("https://gitlab.com/api/v4/projects/42/pipeline"));
    }
}
