#![doc = "HTTP implementation of the document-service gateway: maps each capability onto its REST endpoint."]
//
//! # HttpGateway
//!
//! [`HttpGateway`] implements [`ServiceGateway`] with `reqwest`, one request per
//! trait method. Paths are resolved against [`ClientConfig::base_url`], every
//! request carries the bearer token, and bodies are camelCase JSON.
//!
//! Non-2xx responses become [`ApiError::Status`] with the response body kept
//! for diagnostics. The workflows in `pogodoc-core` see it boxed as a
//! [`GatewayError`] and surface it as a `Service` error tagged with the step.

use async_trait::async_trait;
use pogodoc_core::contract::{GatewayError, ServiceGateway};
use pogodoc_core::model::{
    GenerateTemplatePreviewsRequest, GenerateTemplatePreviewsResponse, InitRenderJobRequest,
    InitRenderJobResponse, InitTemplateCreationResponse, JobStatusResponse,
    SaveCreatedTemplateRequest, StartImmediateRenderRequest, StartImmediateRenderResponse,
    StartRenderJobRequest, StartRenderJobResponse, UpdateTemplateRequest,
};
use pogodoc_core::ClientConfig;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to parse service response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status of a rejected request, if the service answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(e) => e.status(),
            _ => None,
        }
    }
}

pub struct HttpGateway {
    client: Client,
    config: ClientConfig,
}

impl HttpGateway {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        HttpGateway { client, config }
    }

    pub fn user_agent() -> &'static str {
        concat!("pogodoc-rust/", env!("CARGO_PKG_VERSION"))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    ///
    /// `ClientConfig` only holds hierarchical http(s) URLs, so the path is
    /// always extendable.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.config.base_url().clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(%method, %url, "Calling document service");
        self.client
            .request(method, url)
            .bearer_auth(self.config.token())
    }

    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let bytes = Self::checked(req).await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            error!(error = %e, "Failed to decode service response");
            ApiError::Decode(e)
        })
    }

    /// For endpoints whose response body carries nothing the workflows use.
    async fn execute_unit(&self, req: RequestBuilder) -> Result<(), ApiError> {
        Self::checked(req).await.map(drop)
    }

    async fn checked(req: RequestBuilder) -> Result<bytes::Bytes, ApiError> {
        let resp = req.send().await.map_err(|e| {
            error!(error = ?e, "Document service request failed");
            ApiError::Http(e)
        })?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            error!(%status, body = %body, "Document service rejected request");
            return Err(ApiError::Status { status, body });
        }
        Ok(bytes)
    }
}

#[async_trait]
impl ServiceGateway for HttpGateway {
    async fn init_template_creation(&self) -> Result<InitTemplateCreationResponse, GatewayError> {
        let req = self.request(Method::GET, &["templates", "init"]);
        Ok(self.execute(req).await?)
    }

    async fn extract_template_files(&self, template_id: &str) -> Result<(), GatewayError> {
        let req = self.request(Method::POST, &["templates", template_id, "unzip"]);
        Ok(self.execute_unit(req).await?)
    }

    async fn generate_template_previews(
        &self,
        template_id: &str,
        body: GenerateTemplatePreviewsRequest,
    ) -> Result<GenerateTemplatePreviewsResponse, GatewayError> {
        let req = self
            .request(Method::POST, &["templates", template_id, "render-previews"])
            .json(&body);
        Ok(self.execute(req).await?)
    }

    async fn save_created_template(
        &self,
        template_id: &str,
        body: SaveCreatedTemplateRequest,
    ) -> Result<(), GatewayError> {
        let req = self
            .request(Method::POST, &["templates", template_id])
            .json(&body);
        Ok(self.execute_unit(req).await?)
    }

    async fn update_template(
        &self,
        template_id: &str,
        body: UpdateTemplateRequest,
    ) -> Result<(), GatewayError> {
        let req = self
            .request(Method::PUT, &["templates", template_id])
            .json(&body);
        Ok(self.execute_unit(req).await?)
    }

    async fn init_render_job(
        &self,
        body: InitRenderJobRequest,
    ) -> Result<InitRenderJobResponse, GatewayError> {
        let req = self
            .request(Method::POST, &["documents", "init"])
            .json(&body);
        Ok(self.execute(req).await?)
    }

    async fn start_render_job(
        &self,
        job_id: &str,
        body: StartRenderJobRequest,
    ) -> Result<StartRenderJobResponse, GatewayError> {
        let req = self
            .request(Method::POST, &["documents", job_id, "render"])
            .json(&body);
        Ok(self.execute(req).await?)
    }

    async fn start_immediate_render(
        &self,
        body: StartImmediateRenderRequest,
    ) -> Result<StartImmediateRenderResponse, GatewayError> {
        let req = self
            .request(Method::POST, &["documents", "immediate-render"])
            .json(&body);
        Ok(self.execute(req).await?)
    }

    async fn get_job_status(&self, job_id: &str) -> Result<JobStatusResponse, GatewayError> {
        let req = self.request(Method::GET, &["jobs", job_id]);
        Ok(self.execute(req).await?)
    }
}
