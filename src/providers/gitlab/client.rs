use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::auth::Token;
use crate::error::{Result, TriggerError};
use crate::identity::ProjectId;

pub mod pipelines;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin REST client for the GitLab v4 API.
pub struct GitLabClient {
    client: Client,
    api_url: Url,
    token: Option<Token>,
}

impl GitLabClient {
    /// Creates a client for the instance at `base_url`.
    ///
    /// A base URL with a path (e.g. `https://example.com/gitlab`) is kept as
    /// a prefix for every API call.
    pub fn new(base_url: &str, token: Option<Token>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("glpipeline/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| TriggerError::Config(format!("Failed to create HTTP client: {e}")))?;

        let mut base = Url::parse(base_url)
            .map_err(|e| TriggerError::Config(format!("Invalid base URL '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(TriggerError::Config(format!(
                "Invalid base URL '{base_url}': not a hierarchical URL"
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let api_url = base
            .join("api/v4/")
            .map_err(|e| TriggerError::Config(format!("Invalid API base URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            token,
        })
    }

    /// Helper to build authenticated requests
    pub fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.token {
            request.bearer_auth(token.as_str())
        } else {
            request
        }
    }

    /// Construct project base URL
    pub fn project_url(&self, project_id: ProjectId) -> Result<Url> {
        self.api_url
            .join(&format!("projects/{project_id}/"))
            .map_err(|e| TriggerError::Config(format!("Invalid project URL: {e}")))
    }
}
