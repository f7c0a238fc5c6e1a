//! Request and response shapes exchanged with the document service.
//!
//! These are plain data. Field names serialize as camelCase to match the
//! service's JSON. `sample_data` and render `data` are opaque
//! [`serde_json::Value`]s: this crate only transports them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PogodocError;

/// Rendering engine a template is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    Docx,
    Xlsx,
    Pptx,
    Ejs,
    Html,
    Latex,
    React,
}

impl TemplateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Docx => "docx",
            TemplateType::Xlsx => "xlsx",
            TemplateType::Pptx => "pptx",
            TemplateType::Ejs => "ejs",
            TemplateType::Html => "html",
            TemplateType::Latex => "latex",
            TemplateType::React => "react",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateType {
    type Err = PogodocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "docx" => Ok(TemplateType::Docx),
            "xlsx" => Ok(TemplateType::Xlsx),
            "pptx" => Ok(TemplateType::Pptx),
            "ejs" => Ok(TemplateType::Ejs),
            "html" => Ok(TemplateType::Html),
            "latex" => Ok(TemplateType::Latex),
            "react" => Ok(TemplateType::React),
            other => Err(PogodocError::Validation(format!(
                "unknown template type {other:?}"
            ))),
        }
    }
}

/// Output format of a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderTarget {
    Pdf,
    Html,
    Docx,
    Xlsx,
    Pptx,
    Png,
    Jpg,
}

impl RenderTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderTarget::Pdf => "pdf",
            RenderTarget::Html => "html",
            RenderTarget::Docx => "docx",
            RenderTarget::Xlsx => "xlsx",
            RenderTarget::Pptx => "pptx",
            RenderTarget::Png => "png",
            RenderTarget::Jpg => "jpg",
        }
    }
}

impl fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderTarget {
    type Err = PogodocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(RenderTarget::Pdf),
            "html" => Ok(RenderTarget::Html),
            "docx" => Ok(RenderTarget::Docx),
            "xlsx" => Ok(RenderTarget::Xlsx),
            "pptx" => Ok(RenderTarget::Pptx),
            "png" => Ok(RenderTarget::Png),
            "jpg" => Ok(RenderTarget::Jpg),
            other => Err(PogodocError::Validation(format!(
                "unknown render target {other:?}"
            ))),
        }
    }
}

/// Descriptive information persisted alongside a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub categories: Vec<String>,
    /// Used by the service to render the catalog previews.
    pub sample_data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitTemplateCreationResponse {
    pub template_id: String,
    pub presigned_template_upload_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateTemplatePreviewsRequest {
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewJob {
    pub job_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTemplatePreviewsResponse {
    pub png_preview: PreviewJob,
    pub pdf_preview: PreviewJob,
}

/// Job ids of the two previews attached to a saved or updated template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewIds {
    pub png_job_id: String,
    pub pdf_job_id: String,
}

impl From<GenerateTemplatePreviewsResponse> for PreviewIds {
    fn from(previews: GenerateTemplatePreviewsResponse) -> Self {
        PreviewIds {
            png_job_id: previews.png_preview.job_id,
            pdf_job_id: previews.pdf_preview.job_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCreatedTemplateRequest {
    pub template_info: TemplateMetadata,
    pub preview_ids: PreviewIds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    pub template_info: TemplateMetadata,
    pub preview_ids: PreviewIds,
    /// Id under which the replacement archive was uploaded and extracted.
    pub content_id: String,
}

/// Everything needed to render one document.
///
/// At least one of `template_id` and `template` must be non-empty; the
/// render workflows reject it otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSpec {
    pub template_type: TemplateType,
    pub target: RenderTarget,
    pub template_id: Option<String>,
    /// Inline template source, uploaded as `text/html`.
    pub template: Option<String>,
    pub data: Value,
    pub should_wait_for_render_completion: Option<bool>,
}

impl RenderSpec {
    pub fn new(template_type: TemplateType, target: RenderTarget, data: Value) -> Self {
        RenderSpec {
            template_type,
            target,
            template_id: None,
            template: None,
            data,
            should_wait_for_render_completion: None,
        }
    }

    pub fn with_template_id(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn wait_for_completion(mut self, wait: bool) -> Self {
        self.should_wait_for_render_completion = Some(wait);
        self
    }

    /// Inline template source, if one was given and it is non-empty.
    pub fn inline_template(&self) -> Option<&str> {
        self.template.as_deref().filter(|t| !t.is_empty())
    }

    fn template_handle(&self) -> Option<&str> {
        self.template_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn validate(&self) -> Result<(), PogodocError> {
        if self.template_handle().is_none() && self.inline_template().is_none() {
            return Err(PogodocError::Validation(
                "render spec needs a template id or an inline template".to_string(),
            ));
        }
        Ok(())
    }

    pub fn init_request(&self) -> InitRenderJobRequest {
        InitRenderJobRequest {
            template_type: self.template_type,
            target: self.target,
            template_id: self.template_handle().map(str::to_owned),
        }
    }

    pub fn start_request(&self) -> StartRenderJobRequest {
        StartRenderJobRequest {
            should_wait_for_render_completion: self.should_wait_for_render_completion,
        }
    }

    pub fn immediate_request(&self) -> StartImmediateRenderRequest {
        StartImmediateRenderRequest {
            template_type: self.template_type,
            target: self.target,
            template_id: self.template_handle().map(str::to_owned),
            template: self.inline_template().map(str::to_owned),
            data: self.data.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitRenderJobRequest {
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub target: RenderTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitRenderJobResponse {
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presigned_data_upload_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presigned_template_upload_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRenderJobRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_wait_for_render_completion: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRenderJobResponse {
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<JobOutput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartImmediateRenderRequest {
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub target: RenderTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartImmediateRenderResponse {
    pub url: String,
}

/// Render job status as reported by the service.
///
/// Statuses this client does not know deserialize to [`JobStatus::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Done,
    Failed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutputData {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutput {
    pub data: JobOutputData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<JobOutput>,
}

impl JobStatusResponse {
    pub fn is_done(&self) -> bool {
        self.status == Some(JobStatus::Done)
    }

    pub fn output_url(&self) -> Option<&str> {
        self.output.as_ref().map(|o| o.data.url.as_str())
    }
}
