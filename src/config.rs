use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::providers::gitlab::DEFAULT_TIMEOUT;

/// Effective settings for one invocation, after merging command-line flags,
/// environment variables, the configuration file and built-in defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub token_file: PathBuf,
    pub project_file: PathBuf,
    pub id_file: PathBuf,
    pub remote: String,
    pub timeout: Duration,
    pub format: OutputFormat,
    pub pretty: bool,
    pub output: Option<PathBuf>,
    pub dry_run: bool,
}

/// Configuration file structure for glpipeline.
///
/// Holds the defaults that would otherwise have to be repeated on every
/// invocation. Command-line flags and `GLCLI_*` environment variables take
/// precedence over anything set here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// GitLab connection and project lookup settings
    #[serde(default)]
    pub gitlab: GitLabConfig,

    /// Output format preferences
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitLabConfig {
    /// GitLab instance base URL
    #[serde(default = "default_gitlab_base_url")]
    pub base_url: String,

    /// File holding the personal access token
    pub token_file: Option<PathBuf>,

    /// JSON file mapping repository URLs to project ids
    pub project_file: Option<PathBuf>,

    /// File holding an explicit project id
    #[serde(default = "default_id_file")]
    pub id_file: PathBuf,

    /// Git remote whose URL identifies the project
    #[serde(default = "default_remote")]
    pub remote: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            base_url: default_gitlab_base_url(),
            token_file: None,
            project_file: None,
            id_file: default_id_file(),
            remote: default_remote(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_gitlab_base_url() -> String {
    "https://gitlab.com".to_string()
}

fn default_id_file() -> PathBuf {
    PathBuf::from(".gitlab.id")
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn home_file(name: &str) -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(name))
        .unwrap_or_else(|| PathBuf::from(name))
}

impl GitLabConfig {
    /// Token file, defaulting to `~/.gitlab.token`.
    pub fn token_file(&self) -> PathBuf {
        self.token_file
            .clone()
            .unwrap_or_else(|| home_file(".gitlab.token"))
    }

    /// Project directory file, defaulting to `~/.gitlab-projects.json`.
    pub fn project_file(&self) -> PathBuf {
        self.project_file
            .clone()
            .unwrap_or_else(|| home_file(".gitlab-projects.json"))
    }
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path (must exist)
    /// 2. ./glpipeline.toml
    /// 3. ./glpipeline.json
    /// 4. ./glpipeline.yaml
    /// 5. ./glpipeline.yml
    /// 6. `<config dir>/glpipeline/config.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = [
            "glpipeline.toml",
            "glpipeline.json",
            "glpipeline.yaml",
            "glpipeline.yml",
        ];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        if let Some(path) = dirs::config_dir().map(|dir| dir.join("glpipeline").join("config.toml"))
        {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
        }
    }
}
