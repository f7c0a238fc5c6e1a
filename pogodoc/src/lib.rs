//! # pogodoc
//!
//! Rust SDK for the Pogodoc document-generation service.
//!
//! [`PogodocClient`] wires the workflows of `pogodoc-core` to the service's
//! REST API through [`HttpGateway`] and to object storage through
//! [`PresignedUploader`]. Template archives and render inputs travel directly
//! to pre-signed URLs; only metadata goes through the API.
//!
//! ```no_run
//! use pogodoc::{CancellationToken, PogodocClient, RenderSpec, RenderTarget, TemplateType};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), pogodoc::PogodocError> {
//! let client = PogodocClient::from_env()?;
//! let spec = RenderSpec::new(TemplateType::Html, RenderTarget::Pdf, json!({"name": "Ada"}))
//!     .with_template("<h1>Hello <%= name %></h1>");
//! let done = client
//!     .generate_document(&spec, &CancellationToken::new())
//!     .await?;
//! println!("{:?}", done.output_url());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod gateway;

pub use client::PogodocClient;
pub use gateway::{ApiError, HttpGateway};
pub use pogodoc_core::{
    CancellationToken, ClientConfig, ErrorKind, FilePayload, JobStatus, JobStatusResponse,
    PogodocError, PresignedUploader, RenderSpec, RenderTarget, StartImmediateRenderResponse,
    StartRenderJobResponse, TemplateMetadata, TemplateType, WorkflowStep, DEFAULT_BASE_URL,
};
