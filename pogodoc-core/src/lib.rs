#![doc = "pogodoc-core: workflow orchestration for the Pogodoc document service."]

//! This crate sequences the service's endpoints into the template-lifecycle
//! and render-job workflows, streams payloads to pre-signed object-store
//! URLs, and polls render jobs to completion. It knows nothing about endpoint
//! paths or authentication: those live behind [`contract::ServiceGateway`],
//! implemented by the `pogodoc` crate (and by mocks in tests).
//!
//! # Usage
//! Build a [`templates::TemplateOrchestrator`] or [`render::RenderOrchestrator`]
//! over any gateway/uploader pair and call its workflows with a
//! [`CancellationToken`].

pub mod config;
pub mod contract;
pub mod error;
pub mod model;
pub mod payload;
pub mod render;
pub mod templates;
pub mod uploader;
mod workflow;

pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use contract::{GatewayError, ObjectUploader, ServiceGateway};
pub use error::{ErrorKind, PogodocError, WorkflowStep};
pub use model::{
    JobStatus, JobStatusResponse, RenderSpec, RenderTarget, StartImmediateRenderResponse,
    StartRenderJobResponse, TemplateMetadata, TemplateType,
};
pub use payload::{load_file, FilePayload};
pub use render::RenderOrchestrator;
pub use templates::TemplateOrchestrator;
pub use tokio_util::sync::CancellationToken;
pub use uploader::PresignedUploader;
