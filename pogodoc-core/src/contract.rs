//! # contract: the seams the workflows are written against
//!
//! Two traits separate orchestration from transport:
//!
//! - [`ServiceGateway`]: one method per document-service endpoint the
//!   workflows call. Each is a single request/response; the workflows never
//!   retry them.
//! - [`ObjectUploader`]: pushes a byte payload to a pre-signed object-store
//!   URL.
//!
//! Both are annotated for `mockall`, and the generated `MockServiceGateway`
//! and `MockObjectUploader` are exported under the default
//! `test-export-mocks` feature so dependent crates can drive the workflows
//! deterministically in their own tests.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::PogodocError;
use crate::model::{
    GenerateTemplatePreviewsRequest, GenerateTemplatePreviewsResponse, InitRenderJobRequest,
    InitRenderJobResponse, InitTemplateCreationResponse, JobStatusResponse,
    SaveCreatedTemplateRequest, StartImmediateRenderRequest, StartImmediateRenderResponse,
    StartRenderJobRequest, StartRenderJobResponse, UpdateTemplateRequest,
};
use crate::payload::FilePayload;

/// Error type returned by gateway implementations.
pub type GatewayError = Box<dyn std::error::Error + Send + Sync>;

/// Capability surface of the remote document service.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ServiceGateway: Send + Sync {
    /// Reserves a new template (or content) id and a pre-signed URL for its archive.
    async fn init_template_creation(&self) -> Result<InitTemplateCreationResponse, GatewayError>;

    /// Unpacks the uploaded archive server-side.
    async fn extract_template_files(&self, template_id: &str) -> Result<(), GatewayError>;

    async fn generate_template_previews(
        &self,
        template_id: &str,
        req: GenerateTemplatePreviewsRequest,
    ) -> Result<GenerateTemplatePreviewsResponse, GatewayError>;

    async fn save_created_template(
        &self,
        template_id: &str,
        req: SaveCreatedTemplateRequest,
    ) -> Result<(), GatewayError>;

    async fn update_template(
        &self,
        template_id: &str,
        req: UpdateTemplateRequest,
    ) -> Result<(), GatewayError>;

    async fn init_render_job(
        &self,
        req: InitRenderJobRequest,
    ) -> Result<InitRenderJobResponse, GatewayError>;

    async fn start_render_job(
        &self,
        job_id: &str,
        req: StartRenderJobRequest,
    ) -> Result<StartRenderJobResponse, GatewayError>;

    async fn start_immediate_render(
        &self,
        req: StartImmediateRenderRequest,
    ) -> Result<StartImmediateRenderResponse, GatewayError>;

    async fn get_job_status(&self, job_id: &str) -> Result<JobStatusResponse, GatewayError>;
}

/// Uploads a payload to a pre-signed object-store URL.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ObjectUploader: Send + Sync {
    /// Issues one PUT carrying `payload` with the given content type.
    ///
    /// Implementations reject an empty content type or payload with
    /// [`PogodocError::Validation`] before touching the network.
    async fn upload(
        &self,
        url: &str,
        payload: &FilePayload,
        content_type: &str,
    ) -> Result<(), PogodocError>;
}
