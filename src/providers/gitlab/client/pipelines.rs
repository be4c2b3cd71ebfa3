use log::{debug, info};
use reqwest::header::CONTENT_TYPE;
use url::Url;

use super::GitLabClient;
use crate::error::{Result, TriggerError};
use crate::identity::ProjectId;
use crate::providers::gitlab::types::{
    DryRunPreview, PipelineRequest, PipelineResult, TriggerOutcome,
};

impl GitLabClient {
    /// `POST` endpoint that creates a pipeline for `project_id`.
    pub fn pipeline_url(&self, project_id: ProjectId) -> Result<Url> {
        self.project_url(project_id)?
            .join("pipeline")
            .map_err(|e| TriggerError::Config(format!("Invalid pipeline URL: {e}")))
    }

    /// Computes the URL and body a trigger would send, without sending it.
    pub fn preview_pipeline(
        &self,
        project_id: ProjectId,
        request: &PipelineRequest,
    ) -> Result<DryRunPreview> {
        Ok(DryRunPreview {
            method: "POST",
            url: self.pipeline_url(project_id)?.to_string(),
            body: serde_json::to_string(request)?,
        })
    }

    /// Creates a pipeline. The request is sent exactly once.
    ///
    /// # Errors
    ///
    /// - [`TriggerError::Transport`] if the request could not be completed
    /// - [`TriggerError::Api`] with the raw body for any non-2xx status
    /// - [`TriggerError::Decode`] with the raw body if the response is not a
    ///   pipeline object
    pub async fn create_pipeline(
        &self,
        project_id: ProjectId,
        request: &PipelineRequest,
    ) -> Result<PipelineResult> {
        let preview = self.preview_pipeline(project_id, request)?;
        info!("POST {}", preview.url);
        debug!("Request body: {}", preview.body);

        let response = self
            .auth_request(
                self.client
                    .post(preview.url)
                    .header(CONTENT_TYPE, "application/json")
                    .body(preview.body),
            )
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("GitLab answered {status}: {body}");

        if !status.is_success() {
            return Err(TriggerError::Api {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str::<PipelineResult>(&body) {
            Ok(pipeline) => {
                info!("Created pipeline {} ({})", pipeline.id, pipeline.web_url);
                Ok(pipeline)
            }
            Err(source) => Err(TriggerError::Decode { source, body }),
        }
    }

    /// Creates a pipeline, or only previews it when `dry_run` is set.
    pub async fn trigger(
        &self,
        project_id: ProjectId,
        request: &PipelineRequest,
        dry_run: bool,
    ) -> Result<TriggerOutcome> {
        if dry_run {
            let preview = self.preview_pipeline(project_id, request)?;
            info!("Dry run: not sending {} {}", preview.method, preview.url);
            return Ok(TriggerOutcome::NotExecuted(preview));
        }

        self.create_pipeline(project_id, request)
            .await
            .map(TriggerOutcome::Created)
    }
}
