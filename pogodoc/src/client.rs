//! # PogodocClient
//!
//! The SDK entry point. Construct it one of three ways:
//!
//! - [`PogodocClient::from_env`]: `POGODOC_API_TOKEN` (required) and
//!   `POGODOC_BASE_URL` (optional), with a `.env` file loaded first if present
//! - [`PogodocClient::with_config`]: explicit base URL and token
//! - [`PogodocClient::with_token`]: token only, default base URL
//!
//! Every operation borrows a [`CancellationToken`]. The client holds only its
//! immutable configuration and connection pools, so one instance can serve
//! concurrent calls.

use std::path::Path;

use pogodoc_core::{
    CancellationToken, ClientConfig, FilePayload, JobStatusResponse, PogodocError,
    PresignedUploader, RenderOrchestrator, RenderSpec, StartImmediateRenderResponse,
    StartRenderJobResponse, TemplateMetadata, TemplateOrchestrator,
};
use tracing::error;

use crate::gateway::HttpGateway;

pub struct PogodocClient {
    gateway: HttpGateway,
    uploader: PresignedUploader,
}

impl PogodocClient {
    pub fn new(config: ClientConfig) -> Result<Self, PogodocError> {
        let gateway = HttpGateway::new(config).map_err(|e| {
            error!(error = ?e, "Failed to build service HTTP client");
            PogodocError::Config(format!("failed to build HTTP client: {e}"))
        })?;
        let uploader = PresignedUploader::new()?;
        Ok(PogodocClient { gateway, uploader })
    }

    /// Loads `.env` if present (process variables win), then reads the
    /// configuration from the environment.
    pub fn from_env() -> Result<Self, PogodocError> {
        dotenvy::dotenv().ok();
        Self::new(ClientConfig::from_env()?)
    }

    pub fn with_config(base_url: &str, token: impl Into<String>) -> Result<Self, PogodocError> {
        Self::new(ClientConfig::new(base_url, token)?)
    }

    pub fn with_token(token: impl Into<String>) -> Result<Self, PogodocError> {
        Self::new(ClientConfig::with_token(token)?)
    }

    pub fn config(&self) -> &ClientConfig {
        self.gateway.config()
    }

    fn templates(&self) -> TemplateOrchestrator<'_, HttpGateway, PresignedUploader> {
        TemplateOrchestrator::new(&self.gateway, &self.uploader)
    }

    fn renders(&self) -> RenderOrchestrator<'_, HttpGateway, PresignedUploader> {
        RenderOrchestrator::new(&self.gateway, &self.uploader)
    }

    /// Uploads the zip archive at `path` as a new template and returns its id.
    pub async fn save_template(
        &self,
        path: impl AsRef<Path>,
        metadata: TemplateMetadata,
        cancel: &CancellationToken,
    ) -> Result<String, PogodocError> {
        self.templates().save_template(path, metadata, cancel).await
    }

    pub async fn save_template_from_stream(
        &self,
        payload: &FilePayload,
        metadata: TemplateMetadata,
        cancel: &CancellationToken,
    ) -> Result<String, PogodocError> {
        self.templates()
            .save_template_from_payload(payload, metadata, cancel)
            .await
    }

    /// Replaces the content of `template_id` with the archive at `path`.
    pub async fn update_template(
        &self,
        template_id: &str,
        path: impl AsRef<Path>,
        metadata: TemplateMetadata,
        cancel: &CancellationToken,
    ) -> Result<String, PogodocError> {
        self.templates()
            .update_template(template_id, path, metadata, cancel)
            .await
    }

    pub async fn update_template_from_stream(
        &self,
        template_id: &str,
        payload: &FilePayload,
        metadata: TemplateMetadata,
        cancel: &CancellationToken,
    ) -> Result<String, PogodocError> {
        self.templates()
            .update_template_from_payload(template_id, payload, metadata, cancel)
            .await
    }

    pub async fn start_generate_document(
        &self,
        spec: &RenderSpec,
        cancel: &CancellationToken,
    ) -> Result<StartRenderJobResponse, PogodocError> {
        self.renders().start_generate(spec, cancel).await
    }

    /// Starts a render job and polls it until the service reports `done`.
    pub async fn generate_document(
        &self,
        spec: &RenderSpec,
        cancel: &CancellationToken,
    ) -> Result<JobStatusResponse, PogodocError> {
        self.renders().generate(spec, cancel).await
    }

    pub async fn generate_document_immediate(
        &self,
        spec: &RenderSpec,
        cancel: &CancellationToken,
    ) -> Result<StartImmediateRenderResponse, PogodocError> {
        self.renders().generate_immediate(spec, cancel).await
    }

    pub async fn poll_for_job_completion(
        &self,
        job_id: &str,
        cancel: &CancellationToken,
    ) -> Result<JobStatusResponse, PogodocError> {
        self.renders().poll_for_completion(job_id, cancel).await
    }
}
