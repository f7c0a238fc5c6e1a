//! Template lifecycle: save a new template or replace an existing one's content.
//!
//! Both workflows run the same staging sequence and differ only in the last
//! call:
//!
//! 1. `init_template_creation` reserves an id and a pre-signed upload URL
//! 2. the archive is uploaded there as `application/zip`
//! 3. `extract_template_files` unpacks it server-side
//! 4. `generate_template_previews` renders png/pdf previews from the sample data
//! 5. `save_created_template` (save) or `update_template` (update)
//!
//! Every step is a barrier: a failure aborts the workflow with the step name
//! in the error. Nothing is compensated, so a failure after step 1 can leave
//! an orphaned server-side template.

use std::path::Path;

use futures::TryFutureExt;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::contract::{ObjectUploader, ServiceGateway};
use crate::error::{PogodocError, WorkflowStep};
use crate::model::{
    GenerateTemplatePreviewsRequest, PreviewIds, SaveCreatedTemplateRequest, TemplateMetadata,
    UpdateTemplateRequest,
};
use crate::payload::{load_file, FilePayload};
use crate::uploader::CONTENT_TYPE_ZIP;
use crate::workflow::run_step;

/// Content staged by steps 1-4, ready to be attached to a template.
struct StagedContent {
    content_id: String,
    preview_ids: PreviewIds,
}

pub struct TemplateOrchestrator<'a, G: ?Sized, U: ?Sized> {
    gateway: &'a G,
    uploader: &'a U,
}

impl<'a, G, U> TemplateOrchestrator<'a, G, U>
where
    G: ServiceGateway + ?Sized,
    U: ObjectUploader + ?Sized,
{
    pub fn new(gateway: &'a G, uploader: &'a U) -> Self {
        TemplateOrchestrator { gateway, uploader }
    }

    /// Reads the archive at `path` and saves it as a new template.
    pub async fn save_template(
        &self,
        path: impl AsRef<Path>,
        metadata: TemplateMetadata,
        cancel: &CancellationToken,
    ) -> Result<String, PogodocError> {
        let payload = load_file(path)
            .await
            .map_err(|e| e.at(WorkflowStep::ReadingTemplateFile))?;
        self.save_template_from_payload(&payload, metadata, cancel)
            .await
    }

    /// Saves `payload` as a new template and returns its id.
    pub async fn save_template_from_payload(
        &self,
        payload: &FilePayload,
        metadata: TemplateMetadata,
        cancel: &CancellationToken,
    ) -> Result<String, PogodocError> {
        info!(title = %metadata.title, bytes = payload.len(), "Saving new template");
        let staged = self.stage_content(payload, &metadata, cancel).await?;
        let template_id = staged.content_id;

        let req = SaveCreatedTemplateRequest {
            template_info: metadata,
            preview_ids: staged.preview_ids,
        };
        run_step(cancel, WorkflowStep::SavingCreatedTemplate, || {
            self.gateway
                .save_created_template(&template_id, req)
                .map_err(PogodocError::Service)
        })
        .await?;

        info!(template_id = %template_id, "Template saved");
        Ok(template_id)
    }

    /// Reads the archive at `path` and makes it the new content of `template_id`.
    pub async fn update_template(
        &self,
        template_id: &str,
        path: impl AsRef<Path>,
        metadata: TemplateMetadata,
        cancel: &CancellationToken,
    ) -> Result<String, PogodocError> {
        let payload = load_file(path)
            .await
            .map_err(|e| e.at(WorkflowStep::ReadingTemplateFile))?;
        self.update_template_from_payload(template_id, &payload, metadata, cancel)
            .await
    }

    /// Stages `payload` under a fresh content id, then points `template_id` at it.
    pub async fn update_template_from_payload(
        &self,
        template_id: &str,
        payload: &FilePayload,
        metadata: TemplateMetadata,
        cancel: &CancellationToken,
    ) -> Result<String, PogodocError> {
        info!(template_id, bytes = payload.len(), "Updating template");
        let staged = self.stage_content(payload, &metadata, cancel).await?;

        let req = UpdateTemplateRequest {
            template_info: metadata,
            preview_ids: staged.preview_ids,
            content_id: staged.content_id,
        };
        run_step(cancel, WorkflowStep::UpdatingTemplate, || {
            self.gateway
                .update_template(template_id, req)
                .map_err(PogodocError::Service)
        })
        .await?;

        info!(template_id, "Template updated");
        Ok(template_id.to_string())
    }

    async fn stage_content(
        &self,
        payload: &FilePayload,
        metadata: &TemplateMetadata,
        cancel: &CancellationToken,
    ) -> Result<StagedContent, PogodocError> {
        let created = run_step(cancel, WorkflowStep::InitTemplateCreation, || {
            self.gateway
                .init_template_creation()
                .map_err(PogodocError::Service)
        })
        .await?;
        let content_id = created.template_id;
        info!(content_id = %content_id, "Reserved template content id");

        run_step(cancel, WorkflowStep::UploadingTemplate, || {
            self.uploader.upload(
                &created.presigned_template_upload_url,
                payload,
                CONTENT_TYPE_ZIP,
            )
        })
        .await?;

        run_step(cancel, WorkflowStep::ExtractingTemplateFiles, || {
            self.gateway
                .extract_template_files(&content_id)
                .map_err(PogodocError::Service)
        })
        .await?;

        let preview_req = GenerateTemplatePreviewsRequest {
            template_type: metadata.template_type,
            data: metadata.sample_data.clone(),
        };
        let previews = run_step(cancel, WorkflowStep::GeneratingTemplatePreviews, || {
            self.gateway
                .generate_template_previews(&content_id, preview_req)
                .map_err(PogodocError::Service)
        })
        .await?;

        Ok(StagedContent {
            content_id,
            preview_ids: PreviewIds::from(previews),
        })
    }
}
