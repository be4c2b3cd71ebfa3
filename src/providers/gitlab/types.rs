use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A variable passed to the pipeline, serialized as `{"key": .., "value": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineVariable {
    pub key: String,
    pub value: String,
}

/// Body of `POST /projects/:id/pipeline`.
///
/// Variables keep the order they were given on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRequest {
    #[serde(rename = "ref")]
    pub ref_: String,
    pub variables: Vec<PipelineVariable>,
}

/// Pipeline status as reported by GitLab.
///
/// Statuses this tool does not know about are kept verbatim in `Other`, so
/// they are shown and re-serialized exactly as GitLab sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PipelineStatus {
    Created,
    WaitingForResource,
    Preparing,
    Pending,
    Running,
    Success,
    Failed,
    Canceled,
    Skipped,
    Manual,
    Scheduled,
    Other(String),
}

impl PipelineStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "created",
            Self::WaitingForResource => "waiting_for_resource",
            Self::Preparing => "preparing",
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
            Self::Skipped => "skipped",
            Self::Manual => "manual",
            Self::Scheduled => "scheduled",
            Self::Other(raw) => raw,
        }
    }
}

/// Missing from the response: an empty `Other`.
impl Default for PipelineStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for PipelineStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "created" => Self::Created,
            "waiting_for_resource" => Self::WaitingForResource,
            "preparing" => Self::Preparing,
            "pending" => Self::Pending,
            "running" => Self::Running,
            "success" => Self::Success,
            "failed" => Self::Failed,
            "canceled" => Self::Canceled,
            "skipped" => Self::Skipped,
            "manual" => Self::Manual,
            "scheduled" => Self::Scheduled,
            _ => Self::Other(raw),
        }
    }
}

impl From<PipelineStatus> for String {
    fn from(status: PipelineStatus) -> Self {
        match status {
            PipelineStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// `detailed_status` block of a pipeline response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailedStatus {
    pub icon: String,
    pub text: String,
    pub label: String,
    pub group: String,
    pub tooltip: String,
    pub has_details: bool,
    pub details_path: String,
}

/// A pipeline as returned by GitLab after creation.
///
/// Decoding is lenient: unknown fields are ignored and missing ones keep
/// their default value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineResult {
    pub id: u64,
    pub iid: u64,
    pub project_id: u64,
    pub sha: String,
    #[serde(rename = "ref")]
    pub ref_: String,
    pub status: PipelineStatus,
    pub source: String,
    pub web_url: String,
    pub detailed_status: DetailedStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub committed_at: Option<DateTime<Utc>>,
    /// Run time in seconds, once the pipeline has finished
    pub duration: Option<f64>,
    /// Time spent queued in seconds
    pub queued_duration: Option<f64>,
}

/// What a trigger would send, computed in dry-run mode instead of sending it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DryRunPreview {
    pub method: &'static str,
    pub url: String,
    pub body: String,
}

/// Outcome of a trigger call.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    Created(PipelineResult),
    NotExecuted(DryRunPreview),
}
