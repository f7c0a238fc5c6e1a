//! Pre-signed URL uploads.
//!
//! [`PresignedUploader`] is the production [`ObjectUploader`]: a single
//! buffered `PUT` with explicit `Content-Type` and `Content-Length` headers.
//! Only `200 OK` counts as success. Redirects are not followed and count as
//! failures, and nothing is retried.

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{redirect, Client, StatusCode};
use tracing::{debug, error, info};

use crate::contract::ObjectUploader;
use crate::error::PogodocError;
use crate::payload::FilePayload;

pub const CONTENT_TYPE_ZIP: &str = "application/zip";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_HTML: &str = "text/html";

#[derive(Debug, Clone)]
pub struct PresignedUploader {
    client: Client,
}

impl PresignedUploader {
    pub fn new() -> Result<Self, PogodocError> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| PogodocError::Config(format!("building upload client: {e}")))?;
        Ok(Self::with_client(client))
    }

    /// Uses a caller-built client. Its redirect policy is left as configured.
    pub fn with_client(client: Client) -> Self {
        PresignedUploader { client }
    }
}

#[async_trait]
impl ObjectUploader for PresignedUploader {
    async fn upload(
        &self,
        url: &str,
        payload: &FilePayload,
        content_type: &str,
    ) -> Result<(), PogodocError> {
        if content_type.is_empty() {
            return Err(PogodocError::Validation("content type is empty".to_string()));
        }
        if payload.is_empty() {
            return Err(PogodocError::Validation("payload is empty".to_string()));
        }

        debug!(content_type, bytes = payload.len(), "Uploading payload to pre-signed URL");
        let resp = self
            .client
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, payload.len())
            .body(payload.bytes())
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Upload request failed");
                PogodocError::UploadTransport(e)
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            error!(status = %status, "Object store rejected upload");
            return Err(PogodocError::UploadStatus { status });
        }

        info!(content_type, bytes = payload.len(), "Upload complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use httpmock::MockServer;

    // Nothing listens here; reaching it would be a transport error, not a validation one.
    const UNREACHABLE: &str = "http://127.0.0.1:9/upload";

    fn uploader() -> PresignedUploader {
        PresignedUploader::new().expect("upload client")
    }

    #[tokio::test]
    async fn put_carries_content_type_length_and_exact_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("PUT")
                .path("/bucket/tpl-1")
                .header("content-type", "application/zip")
                .header("content-length", "8")
                .body("PK\u{3}\u{4}abcd");
            then.status(200);
        });

        let payload = FilePayload::new(&b"PK\x03\x04abcd"[..]);
        uploader()
            .upload(&server.url("/bucket/tpl-1"), &payload, CONTENT_TYPE_ZIP)
            .await
            .expect("upload succeeds");
        mock.assert();
    }

    #[tokio::test]
    async fn non_200_is_an_upload_error_with_status() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("PUT").path("/bucket/tpl-1");
            then.status(403).body("AccessDenied");
        });

        let err = uploader()
            .upload(&server.url("/bucket/tpl-1"), &FilePayload::new("zip"), CONTENT_TYPE_ZIP)
            .await
            .expect_err("403 must fail");
        assert_eq!(err.kind(), ErrorKind::Upload);
        assert_eq!(err.upload_status(), Some(StatusCode::FORBIDDEN));
        assert!(err.to_string().contains("403"));
        mock.assert();
    }

    #[tokio::test]
    async fn other_success_codes_and_redirects_are_failures() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("PUT").path("/created");
            then.status(201);
        });
        server.mock(|when, then| {
            when.method("PUT").path("/moved");
            then.status(307).header("location", "/created");
        });

        let err = uploader()
            .upload(&server.url("/created"), &FilePayload::new("{}"), CONTENT_TYPE_JSON)
            .await
            .expect_err("201 is not 200");
        assert_eq!(err.upload_status(), Some(StatusCode::CREATED));

        let err = uploader()
            .upload(&server.url("/moved"), &FilePayload::new("{}"), CONTENT_TYPE_JSON)
            .await
            .expect_err("redirects are not followed");
        assert_eq!(err.upload_status(), Some(StatusCode::TEMPORARY_REDIRECT));
    }

    #[tokio::test]
    async fn empty_payload_is_rejected_before_any_request() {
        let err = uploader()
            .upload(UNREACHABLE, &FilePayload::new(Vec::new()), CONTENT_TYPE_ZIP)
            .await
            .expect_err("empty payload");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn empty_content_type_is_rejected_before_any_request() {
        let err = uploader()
            .upload(UNREACHABLE, &FilePayload::new("<p>hi</p>"), "")
            .await
            .expect_err("empty content type");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let err = uploader()
            .upload(UNREACHABLE, &FilePayload::new("<p>hi</p>"), CONTENT_TYPE_HTML)
            .await
            .expect_err("nothing is listening");
        assert!(matches!(err, PogodocError::UploadTransport(_)));
        assert_eq!(err.kind(), ErrorKind::Upload);
    }
}
