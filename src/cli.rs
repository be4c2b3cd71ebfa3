use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::Token;
use crate::config::{Config, OutputFormat, Settings};
use crate::git::{GitContext, LocalRepository};
use crate::identity::{read_project_id_file, resolve_target, ProjectId, TargetHints};
use crate::output::{export_outcome, RequestProgress};
use crate::providers::gitlab::{GitLabClient, PipelineRequest, ProjectDirectory, TriggerOutcome};

#[derive(Parser)]
#[command(name = "glpipeline")]
#[command(
    author,
    version,
    about = "Run a GitLab CI/CD pipeline for the current project",
    long_about = None
)]
pub struct Cli {
    /// GitLab project id; skips the lookup through the git remote
    #[arg(long, value_name = "ID")]
    id: Option<ProjectId>,

    /// Branch, tag or commit to run the pipeline on [default: current branch]
    #[arg(short, long, visible_alias = "ref", value_name = "REF")]
    branch: Option<String>,

    /// Pipeline variable, can be given several times
    #[arg(long = "var", value_name = "KEY=VALUE")]
    vars: Vec<String>,

    /// GitLab instance URL [default: https://gitlab.com]
    #[arg(short, long, env = "GLCLI_GITLAB_URL")]
    url: Option<String>,

    /// File containing the GitLab access token [default: ~/.gitlab.token]
    #[arg(long, env = "GLCLI_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// JSON file mapping repository URLs to project ids [default: ~/.gitlab-projects.json]
    #[arg(long, env = "GLCLI_PROJECT_FILE")]
    project_file: Option<PathBuf>,

    /// File containing the project id [default: .gitlab.id]
    #[arg(long, env = "GLCLI_ID_FILE")]
    id_file: Option<PathBuf>,

    /// Git remote used to identify the project [default: origin]
    #[arg(long, env = "GLCLI_REMOTE_NAME")]
    remote: Option<String>,

    /// HTTP request timeout in seconds [default: 30]
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(short, long, default_value_t = false)]
    pretty: bool,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the request that would be sent without sending it
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Make the tool more talkative
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Merges flags and environment over the configuration file.
    fn settings(&self, config: Config) -> Settings {
        Settings {
            token_file: self
                .token_file
                .clone()
                .unwrap_or_else(|| config.gitlab.token_file()),
            project_file: self
                .project_file
                .clone()
                .unwrap_or_else(|| config.gitlab.project_file()),
            base_url: self.url.clone().unwrap_or(config.gitlab.base_url),
            id_file: self.id_file.clone().unwrap_or(config.gitlab.id_file),
            remote: self.remote.clone().unwrap_or(config.gitlab.remote),
            timeout: Duration::from_secs(self.timeout.unwrap_or(config.gitlab.timeout_secs)),
            format: self.format.unwrap_or(config.output.format),
            pretty: self.pretty || config.output.pretty,
            output: self.output.clone(),
            dry_run: self.dry_run,
        }
    }

    fn load_token(settings: &Settings) -> Result<Option<Token>> {
        match Token::from_file(&settings.token_file) {
            Ok(token) => Ok(Some(token)),
            Err(e) if settings.dry_run => {
                warn!("{e}; continuing the dry run without a token");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolves the target, builds the request and triggers it.
    async fn trigger_pipeline<G>(&self, settings: &Settings, git: &G) -> Result<TriggerOutcome>
    where
        G: GitContext + ?Sized,
    {
        let explicit_id = match self.id {
            Some(id) => Some(id),
            None => read_project_id_file(&settings.id_file)?,
        };

        let hints = TargetHints {
            project_id: explicit_id,
            ref_: self.branch.as_deref(),
            remote: &settings.remote,
        };
        let target = resolve_target(&hints, git, || {
            ProjectDirectory::load_or_empty(&settings.project_file)
        })?;

        let request = PipelineRequest::build(&target.ref_, self.vars.as_slice())?;
        if !request.variables.is_empty() {
            info!("Pipeline variables: {}", variable_keys(&request));
        }

        let token = Self::load_token(settings)?;
        let client = GitLabClient::new(&settings.base_url, token, settings.timeout)?;

        if settings.dry_run {
            return Ok(client.trigger(target.project_id, &request, true).await?);
        }

        let progress = RequestProgress::start(target.project_id, &target.ref_);
        match client.trigger(target.project_id, &request, false).await {
            Ok(outcome) => {
                progress.finish_success();
                Ok(outcome)
            }
            Err(e) => {
                progress.finish_failure();
                Err(e).with_context(|| {
                    format!(
                        "Failed to trigger a pipeline for project {} on {}",
                        target.project_id, target.ref_
                    )
                })
            }
        }
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let settings = self.settings(config);
        debug!("Effective settings: {settings:?}");

        let cwd = std::env::current_dir().context("Cannot determine the current directory")?;
        let git = LocalRepository::new(cwd);

        let outcome = self.trigger_pipeline(&settings, &git).await?;
        write_outcome(&outcome, &settings)
    }
}

/// Variable names for logging. Values may carry secrets and are never logged.
fn variable_keys(request: &PipelineRequest) -> String {
    request
        .variables
        .iter()
        .map(|variable| variable.key.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prints the outcome to stdout, or writes it as JSON to `--output`.
fn write_outcome(outcome: &TriggerOutcome, settings: &Settings) -> Result<()> {
    match &settings.output {
        Some(output_path) => {
            if settings.format != OutputFormat::Json {
                debug!("Writing JSON to {} instead of a summary", output_path.display());
            }
            let mut file = std::fs::File::create(output_path)
                .with_context(|| format!("Cannot create {}", output_path.display()))?;
            export_outcome(outcome, OutputFormat::Json, settings.pretty, &mut file)?;
            info!("Result written to: {}", output_path.display());
        }
        None => export_outcome(
            outcome,
            settings.format,
            settings.pretty,
            &mut std::io::stdout().lock(),
        )?,
    }
    Ok(())
}
