//! Render job workflows.
//!
//! - [`RenderOrchestrator::start_generate`]: reserve a job, upload its data
//!   and inline template to the returned pre-signed URLs, start it.
//! - [`RenderOrchestrator::generate`]: `start_generate`, then poll until done.
//! - [`RenderOrchestrator::generate_immediate`]: one synchronous render call.
//! - [`RenderOrchestrator::poll_for_completion`]: fixed-interval polling with a
//!   hard attempt cap. It is the only client-side timeout in this crate.

use std::time::Duration;

use futures::TryFutureExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::contract::{ObjectUploader, ServiceGateway};
use crate::error::{PogodocError, WorkflowStep};
use crate::model::{
    JobStatus, JobStatusResponse, RenderSpec, StartImmediateRenderResponse,
    StartRenderJobResponse,
};
use crate::payload::FilePayload;
use crate::uploader::{CONTENT_TYPE_HTML, CONTENT_TYPE_JSON};
use crate::workflow::{pause, run_step};

/// Delay before the first status query.
pub const POLL_INITIAL_DELAY: Duration = Duration::from_secs(1);
/// Delay after each status query that did not report `done`.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const POLL_MAX_ATTEMPTS: u32 = 60;

pub struct RenderOrchestrator<'a, G: ?Sized, U: ?Sized> {
    gateway: &'a G,
    uploader: &'a U,
}

impl<'a, G, U> RenderOrchestrator<'a, G, U>
where
    G: ServiceGateway + ?Sized,
    U: ObjectUploader + ?Sized,
{
    pub fn new(gateway: &'a G, uploader: &'a U) -> Self {
        RenderOrchestrator { gateway, uploader }
    }

    /// Reserves, feeds and starts a render job. The returned job is not yet
    /// terminal unless `should_wait_for_render_completion` was set.
    pub async fn start_generate(
        &self,
        spec: &RenderSpec,
        cancel: &CancellationToken,
    ) -> Result<StartRenderJobResponse, PogodocError> {
        spec.validate()?;
        info!(
            template_type = %spec.template_type,
            target = %spec.target,
            template_id = spec.template_id.as_deref().unwrap_or(""),
            "Starting render job"
        );

        let init_req = spec.init_request();
        let job = run_step(cancel, WorkflowStep::InitRenderJob, || {
            self.gateway
                .init_render_job(init_req)
                .map_err(PogodocError::Service)
        })
        .await?;
        info!(job_id = %job.job_id, "Render job reserved");

        match job.presigned_data_upload_url.as_deref() {
            Some(url) => {
                let body = serde_json::to_vec(&spec.data).map_err(|e| {
                    PogodocError::Validation(format!("render data is not serializable: {e}"))
                })?;
                let payload = FilePayload::from(body);
                run_step(cancel, WorkflowStep::UploadingRenderData, || {
                    self.uploader.upload(url, &payload, CONTENT_TYPE_JSON)
                })
                .await?;
            }
            None => debug!(job_id = %job.job_id, "No data upload URL returned; skipping data upload"),
        }

        match (spec.inline_template(), job.presigned_template_upload_url.as_deref()) {
            (Some(template), Some(url)) => {
                let payload = FilePayload::from(template.to_owned());
                run_step(cancel, WorkflowStep::UploadingRenderTemplate, || {
                    self.uploader.upload(url, &payload, CONTENT_TYPE_HTML)
                })
                .await?;
            }
            (Some(_), None) => {
                debug!(job_id = %job.job_id, "No template upload URL returned; skipping template upload")
            }
            (None, _) => {}
        }

        let start_req = spec.start_request();
        let started = run_step(cancel, WorkflowStep::StartingRenderJob, || {
            self.gateway
                .start_render_job(&job.job_id, start_req)
                .map_err(PogodocError::Service)
        })
        .await?;
        info!(job_id = %started.job_id, "Render job started");
        Ok(started)
    }

    /// Starts a render job and waits for it to report `done`.
    pub async fn generate(
        &self,
        spec: &RenderSpec,
        cancel: &CancellationToken,
    ) -> Result<JobStatusResponse, PogodocError> {
        let started = self.start_generate(spec, cancel).await?;
        self.poll_for_completion(&started.job_id, cancel).await
    }

    /// Renders in a single call and returns the output location directly.
    pub async fn generate_immediate(
        &self,
        spec: &RenderSpec,
        cancel: &CancellationToken,
    ) -> Result<StartImmediateRenderResponse, PogodocError> {
        spec.validate()?;
        let req = spec.immediate_request();
        let rendered = run_step(cancel, WorkflowStep::StartingImmediateRender, || {
            self.gateway
                .start_immediate_render(req)
                .map_err(PogodocError::Service)
        })
        .await?;
        info!(url = %rendered.url, "Immediate render complete");
        Ok(rendered)
    }

    /// Polls `job_id` until the service reports `done`.
    ///
    /// Waits [`POLL_INITIAL_DELAY`], then issues up to [`POLL_MAX_ATTEMPTS`]
    /// status queries spaced by [`POLL_INTERVAL`]. Any status other than
    /// `done` keeps the loop going, `failed` included.
    pub async fn poll_for_completion(
        &self,
        job_id: &str,
        cancel: &CancellationToken,
    ) -> Result<JobStatusResponse, PogodocError> {
        debug!(job_id, "Polling render job for completion");
        pause(cancel, POLL_INITIAL_DELAY)
            .await
            .map_err(|e| e.at(WorkflowStep::WaitingForJob))?;

        for attempt in 1..=POLL_MAX_ATTEMPTS {
            let status = run_step(cancel, WorkflowStep::GettingJobStatus, || {
                self.gateway
                    .get_job_status(job_id)
                    .map_err(PogodocError::Service)
            })
            .await?;

            match status.status {
                Some(JobStatus::Done) => {
                    info!(job_id, attempt, "Render job done");
                    return Ok(status);
                }
                Some(JobStatus::Failed) => {
                    warn!(job_id, attempt, "Render job reported failed; still polling")
                }
                other => debug!(job_id, attempt, status = ?other, "Render job not done yet"),
            }

            pause(cancel, POLL_INTERVAL)
                .await
                .map_err(|e| e.at(WorkflowStep::WaitingForJob))?;
        }

        warn!(job_id, attempts = POLL_MAX_ATTEMPTS, "Render job did not complete in time");
        Err(PogodocError::JobNotCompleted {
            job_id: job_id.to_string(),
            attempts: POLL_MAX_ATTEMPTS,
        })
    }
}
