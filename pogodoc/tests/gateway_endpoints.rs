use httpmock::MockServer;
use pogodoc::{ApiError, ClientConfig, HttpGateway, JobStatus, RenderTarget, TemplateType};
use pogodoc_core::contract::ServiceGateway;
use pogodoc_core::model::{
    GenerateTemplatePreviewsRequest, InitRenderJobRequest, PreviewIds, SaveCreatedTemplateRequest,
    StartImmediateRenderRequest, StartRenderJobRequest, UpdateTemplateRequest,
};
use pogodoc_core::TemplateMetadata;
use reqwest::StatusCode;
use serde_json::json;

const TOKEN: &str = "test-token";

fn gateway(server: &MockServer) -> HttpGateway {
    let config = ClientConfig::new(&server.url("/v1"), TOKEN).expect("config");
    HttpGateway::new(config).expect("gateway")
}

fn metadata() -> TemplateMetadata {
    TemplateMetadata {
        title: "Invoice".into(),
        description: "Monthly invoice".into(),
        template_type: TemplateType::Html,
        categories: vec!["invoice".into()],
        sample_data: json!({"total": 10}),
        source_code: None,
    }
}

fn preview_ids() -> PreviewIds {
    PreviewIds {
        png_job_id: "png-1".into(),
        pdf_job_id: "pdf-1".into(),
    }
}

#[tokio::test]
async fn init_template_creation_sends_bearer_token() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/v1/templates/init")
            .header("authorization", "Bearer test-token");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"templateId":"tpl-1","presignedTemplateUploadUrl":"https://bucket/tpl-1"}"#);
    });

    let created = gateway(&server)
        .init_template_creation()
        .await
        .expect("init succeeds");
    mock.assert();
    assert_eq!(created.template_id, "tpl-1");
    assert_eq!(created.presigned_template_upload_url, "https://bucket/tpl-1");
}

#[tokio::test]
async fn template_lifecycle_endpoints_use_template_paths() {
    let server = MockServer::start();
    let unzip = server.mock(|when, then| {
        when.method("POST").path("/v1/templates/tpl-1/unzip");
        then.status(200).body("{}");
    });
    let previews = server.mock(|when, then| {
        when.method("POST")
            .path("/v1/templates/tpl-1/render-previews")
            .json_body_includes(r#"{"type":"html","data":{"total":10}}"#);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"pngPreview":{"jobId":"png-1"},"pdfPreview":{"jobId":"pdf-1"}}"#);
    });
    let save = server.mock(|when, then| {
        when.method("POST")
            .path("/v1/templates/tpl-1")
            .json_body_includes(
                r#"{"templateInfo":{"title":"Invoice","type":"html","sampleData":{"total":10}},"previewIds":{"pngJobId":"png-1","pdfJobId":"pdf-1"}}"#,
            );
        then.status(200);
    });
    let update = server.mock(|when, then| {
        when.method("PUT")
            .path("/v1/templates/tpl-1")
            .json_body_includes(r#"{"contentId":"tpl-2","previewIds":{"pngJobId":"png-1"}}"#);
        then.status(204);
    });

    let gw = gateway(&server);
    gw.extract_template_files("tpl-1").await.expect("unzip");
    let rendered = gw
        .generate_template_previews(
            "tpl-1",
            GenerateTemplatePreviewsRequest {
                template_type: TemplateType::Html,
                data: json!({"total": 10}),
            },
        )
        .await
        .expect("previews");
    assert_eq!(PreviewIds::from(rendered), preview_ids());
    gw.save_created_template(
        "tpl-1",
        SaveCreatedTemplateRequest {
            template_info: metadata(),
            preview_ids: preview_ids(),
        },
    )
    .await
    .expect("save");
    gw.update_template(
        "tpl-1",
        UpdateTemplateRequest {
            template_info: metadata(),
            preview_ids: preview_ids(),
            content_id: "tpl-2".into(),
        },
    )
    .await
    .expect("update");

    unzip.assert();
    previews.assert();
    save.assert();
    update.assert();
}

#[tokio::test]
async fn render_endpoints_use_document_and_job_paths() {
    let server = MockServer::start();
    let init = server.mock(|when, then| {
        when.method("POST")
            .path("/v1/documents/init")
            .json_body_includes(r#"{"type":"html","target":"pdf","templateId":"tpl-1"}"#);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"jobId":"job-1","presignedDataUploadUrl":"https://bucket/data"}"#);
    });
    let start = server.mock(|when, then| {
        when.method("POST")
            .path("/v1/documents/job-1/render")
            .json_body_includes(r#"{"shouldWaitForRenderCompletion":true}"#);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"jobId":"job-1","status":"running"}"#);
    });
    let immediate = server.mock(|when, then| {
        when.method("POST")
            .path("/v1/documents/immediate-render")
            .json_body_includes(r#"{"type":"html","target":"png","template":"<p>x</p>"}"#);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"url":"https://cdn/out.png"}"#);
    });
    let status = server.mock(|when, then| {
        when.method("GET")
            .path("/v1/jobs/job-1")
            .header("authorization", "Bearer test-token");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"jobId":"job-1","status":"done","output":{"data":{"url":"https://cdn/out.pdf"}}}"#);
    });

    let gw = gateway(&server);
    let job = gw
        .init_render_job(InitRenderJobRequest {
            template_type: TemplateType::Html,
            target: RenderTarget::Pdf,
            template_id: Some("tpl-1".into()),
        })
        .await
        .expect("init job");
    assert_eq!(job.job_id, "job-1");
    assert_eq!(job.presigned_data_upload_url.as_deref(), Some("https://bucket/data"));
    assert_eq!(job.presigned_template_upload_url, None);

    let started = gw
        .start_render_job(
            "job-1",
            StartRenderJobRequest {
                should_wait_for_render_completion: Some(true),
            },
        )
        .await
        .expect("start job");
    assert_eq!(started.status, Some(JobStatus::Running));

    let rendered = gw
        .start_immediate_render(StartImmediateRenderRequest {
            template_type: TemplateType::Html,
            target: RenderTarget::Png,
            template_id: None,
            template: Some("<p>x</p>".into()),
            data: json!({}),
        })
        .await
        .expect("immediate");
    assert_eq!(rendered.url, "https://cdn/out.png");

    let done = gw.get_job_status("job-1").await.expect("status");
    assert!(done.is_done());
    assert_eq!(done.output_url(), Some("https://cdn/out.pdf"));

    init.assert();
    start.assert();
    immediate.assert();
    status.assert();
}

#[tokio::test]
async fn unknown_job_status_decodes_as_other() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/v1/jobs/job-1");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"jobId":"job-1","status":"queued-for-gpu"}"#);
    });

    let status = gateway(&server)
        .get_job_status("job-1")
        .await
        .expect("status");
    assert_eq!(status.status, Some(JobStatus::Other));
    assert!(!status.is_done());
}

#[tokio::test]
async fn non_2xx_response_keeps_status_and_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/v1/templates/init");
        then.status(401).body(r#"{"message":"invalid token"}"#);
    });

    let err = gateway(&server)
        .init_template_creation()
        .await
        .expect_err("401 must fail");
    let api = err.downcast_ref::<ApiError>().expect("ApiError");
    assert_eq!(api.status(), Some(StatusCode::UNAUTHORIZED));
    assert!(err.to_string().contains("invalid token"), "got: {err}");
}

#[tokio::test]
async fn malformed_response_is_a_decode_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/v1/jobs/job-1");
        then.status(200).body("not json");
    });

    let err = gateway(&server)
        .get_job_status("job-1")
        .await
        .expect_err("garbage body");
    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::Decode(_))
    ));
}
