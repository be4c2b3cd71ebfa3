use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::Tone;

/// Spinner shown on stderr while the trigger request is in flight
pub struct RequestProgress {
    pb: ProgressBar,
}

impl RequestProgress {
    pub fn start(project_id: impl std::fmt::Display, ref_: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_draw_target(ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::default_spinner().template("  {msg} {spinner}") {
            pb.set_style(style);
        }
        pb.set_message(
            Tone::Busy.paint(format!("Triggering pipeline for project {project_id} on {ref_}"))
                .to_string(),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { pb }
    }

    pub fn finish_success(self) {
        self.pb
            .finish_with_message(Tone::Good.paint("Pipeline created ✓").to_string());
    }

    pub fn finish_failure(self) {
        self.pb
            .finish_with_message(Tone::Bad.paint("Pipeline trigger failed ✗").to_string());
    }
}
