mod client;
mod directory;
mod request;
mod types;

pub use client::{GitLabClient, DEFAULT_TIMEOUT};
pub use directory::ProjectDirectory;
pub use types::{DryRunPreview, PipelineRequest, PipelineResult, PipelineStatus, TriggerOutcome};
