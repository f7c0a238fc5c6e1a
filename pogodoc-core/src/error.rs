//! Error taxonomy for every workflow in this crate.
//!
//! All failures surface as a single [`PogodocError`]. Workflows wrap the
//! failure of an individual step in [`PogodocError::Step`], so the message a
//! caller sees always names the stage that broke, e.g.
//! `"uploading template: upload rejected with status 403 Forbidden"`.
//!
//! Use [`PogodocError::kind`] to branch on the broad category without caring
//! how deeply the cause is wrapped.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::contract::GatewayError;

/// One logical stage of a multi-call workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    ReadingTemplateFile,
    InitTemplateCreation,
    UploadingTemplate,
    ExtractingTemplateFiles,
    GeneratingTemplatePreviews,
    SavingCreatedTemplate,
    UpdatingTemplate,
    InitRenderJob,
    UploadingRenderData,
    UploadingRenderTemplate,
    StartingRenderJob,
    StartingImmediateRender,
    GettingJobStatus,
    WaitingForJob,
}

impl WorkflowStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStep::ReadingTemplateFile => "reading template file",
            WorkflowStep::InitTemplateCreation => "initializing template creation",
            WorkflowStep::UploadingTemplate => "uploading template",
            WorkflowStep::ExtractingTemplateFiles => "extracting template files",
            WorkflowStep::GeneratingTemplatePreviews => "generating template previews",
            WorkflowStep::SavingCreatedTemplate => "saving created template",
            WorkflowStep::UpdatingTemplate => "updating template",
            WorkflowStep::InitRenderJob => "initializing render job",
            WorkflowStep::UploadingRenderData => "uploading render data",
            WorkflowStep::UploadingRenderTemplate => "uploading render template",
            WorkflowStep::StartingRenderJob => "starting render job",
            WorkflowStep::StartingImmediateRender => "starting immediate render",
            WorkflowStep::GettingJobStatus => "getting job status",
            WorkflowStep::WaitingForJob => "waiting for job completion",
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad category of a [`PogodocError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Io,
    Upload,
    Service,
    JobNotCompleted,
    Cancelled,
    Validation,
}

#[derive(Debug, Error)]
pub enum PogodocError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("resolving path {path}: {source}")]
    PathResolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("opening file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reading file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file is empty: {path}")]
    EmptyFile { path: PathBuf },

    /// The object store answered with anything other than `200 OK`.
    #[error("upload rejected with status {status}")]
    UploadStatus { status: reqwest::StatusCode },

    #[error("upload transport failure: {0}")]
    UploadTransport(#[source] reqwest::Error),

    #[error("service request failed: {0}")]
    Service(#[source] GatewayError),

    #[error("job {job_id} not completed after {attempts} status checks")]
    JobNotCompleted { job_id: String, attempts: u32 },

    #[error("operation cancelled")]
    Cancelled,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("{step}: {source}")]
    Step {
        step: WorkflowStep,
        #[source]
        source: Box<PogodocError>,
    },
}

impl PogodocError {
    /// Tags this error with the workflow step it came from.
    pub fn at(self, step: WorkflowStep) -> Self {
        PogodocError::Step {
            step,
            source: Box::new(self),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PogodocError::Config(_) => ErrorKind::Config,
            PogodocError::PathResolution { .. }
            | PogodocError::Open { .. }
            | PogodocError::Read { .. }
            | PogodocError::EmptyFile { .. } => ErrorKind::Io,
            PogodocError::UploadStatus { .. } | PogodocError::UploadTransport(_) => {
                ErrorKind::Upload
            }
            PogodocError::Service(_) => ErrorKind::Service,
            PogodocError::JobNotCompleted { .. } => ErrorKind::JobNotCompleted,
            PogodocError::Cancelled => ErrorKind::Cancelled,
            PogodocError::Validation(_) => ErrorKind::Validation,
            PogodocError::Step { source, .. } => source.kind(),
        }
    }

    /// The outermost step this error was tagged with, if any.
    pub fn step(&self) -> Option<WorkflowStep> {
        match self {
            PogodocError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// HTTP status returned by the object store, when the upload got that far.
    pub fn upload_status(&self) -> Option<reqwest::StatusCode> {
        match self {
            PogodocError::UploadStatus { status } => Some(*status),
            PogodocError::UploadTransport(e) => e.status(),
            PogodocError::Step { source, .. } => source.upload_status(),
            _ => None,
        }
    }

    /// Strips every step wrapper and returns the underlying cause.
    pub fn root(&self) -> &PogodocError {
        match self {
            PogodocError::Step { source, .. } => source.root(),
            other => other,
        }
    }
}
