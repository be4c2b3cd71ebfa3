use std::path::PathBuf;

use thiserror::Error;

use crate::identity::ProjectId;

#[derive(Error, Debug)]
pub enum TriggerError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Cannot read token file {}: {source}", .path.display())]
    TokenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Project directory file not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Malformed project directory file {}: {source}", .path.display())]
    DirectoryParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Git context error: {0}")]
    GitContext(String),

    #[error("Cannot resolve project id: {0}")]
    IdentityUnresolved(String),

    #[error("Project id {project_id} was given explicitly but no branch could be determined ({reason}); pass --branch")]
    MissingBranch {
        project_id: ProjectId,
        reason: String,
    },

    #[error("Invalid pipeline variable '{0}': expected KEY=VALUE")]
    InvalidVariableSyntax(String),

    #[error("Invalid pipeline request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitLab API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Cannot decode GitLab response ({source}): {body}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TriggerError>;
