//! End-to-end runs of the controllers over real HTTP against an in-process server.

mod common;

use std::sync::Arc;

use axum::extract::Multipart;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use common::{pdf, test_page, RecordingAlerts};
use uyviet_desk::api::{ApiResponse, HttpClient, Transport, UPLOAD_PATH};
use uyviet_desk::config::Settings;
use uyviet_desk::ui::{FetchNavigator, FsDownloadSink};
use uyviet_desk::{
    GenerateController, GenerateOutcome, StaticDownloadLink, UploadController, UploadOutcome,
};

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

async fn upload(mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let mime = field.content_type().unwrap_or_default().to_string();
        let Ok(bytes) = field.bytes().await else {
            break;
        };
        return (
            StatusCode::OK,
            Json(json!({
                "text": format!("{} bytes of {} from {}", bytes.len(), mime, name),
                "fields": {
                    "project_name": "Acme Tower",
                    "client": "",
                    "location": "Hà Nội",
                    "scale": null,
                    "special": "PCCC"
                }
            })),
        );
    }

    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "No file or file type not allowed" })),
    )
}

async fn generate(Json(payload): Json<Value>) -> Response {
    let content = payload["content"].as_str().unwrap_or_default();
    if content.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "template missing" })),
        )
            .into_response();
    }

    let short = payload["meta"]["project_short"].as_str().unwrap_or("Project");
    let disposition = format!("attachment; filename=UyViet_{short}_GiaiPhap.docx");
    (
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content.as_bytes().to_vec(),
    )
        .into_response()
}

async fn download_tools() -> Response {
    (
        [(
            header::CONTENT_DISPOSITION,
            "attachment; filename=BoMau.xlsx; filename*=UTF-8''BoMau_VisualDashboards_UyViet.xlsx",
        )],
        b"xlsx-bytes".to_vec(),
    )
        .into_response()
}

/// Start the stand-in drafting service and return a client for it.
async fn spawn_server() -> HttpClient {
    let app = Router::new()
        .route("/api/upload", post(upload))
        .route("/api/generate", post(generate))
        .route("/api/download_tools", get(download_tools));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let settings = Settings {
        server_url: format!("http://{addr}"),
        request_timeout: Some(10),
        ..Settings::default()
    };
    HttpClient::new(&settings).expect("Failed to create client")
}

#[tokio::test]
async fn multipart_upload_fills_page() {
    let transport = Arc::new(spawn_server().await);
    let alerts = RecordingAlerts::new();
    let (page, status) = test_page();
    page.file_input.select(pdf("brief.pdf")).await;

    let outcome = UploadController::new(transport, page.clone(), alerts.clone())
        .run()
        .await
        .unwrap();

    assert!(matches!(outcome, UploadOutcome::Extracted(_)));
    assert_eq!(
        page.preview.value().await,
        "13 bytes of application/pdf from brief.pdf"
    );
    assert_eq!(page.project.value().await, "Acme Tower");
    assert_eq!(page.location.value().await, "Hà Nội");
    assert_eq!(page.client.value().await, "");
    assert_eq!(status.value().await, "Extract xong");
    assert!(alerts.messages().is_empty());
}

#[tokio::test]
async fn wrong_field_name_is_rejected_by_server() {
    let transport = spawn_server().await;

    let response: ApiResponse = transport
        .post_file(UPLOAD_PATH, "document", &pdf("brief.pdf"))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body: Value = response.json().unwrap();
    assert_eq!(body["error"], "No file or file type not allowed");
}

#[tokio::test]
async fn generate_saves_document_under_server_name() {
    let transport = Arc::new(spawn_server().await);
    let dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(FsDownloadSink::new(dir.path()));
    let (page, _status) = test_page();
    page.preview.set_value("Giải pháp thiết kế").await;
    page.project.set_value("Acme Tower").await;

    let outcome = GenerateController::new(transport, page, RecordingAlerts::new(), sink)
        .run()
        .await
        .unwrap();

    let expected = dir.path().join("UyViet_Acme_Tower_GiaiPhap.docx");
    assert_eq!(
        outcome,
        GenerateOutcome::Downloaded {
            filename: "UyViet_Acme_Tower_GiaiPhap.docx".to_string(),
            location: expected.clone(),
        }
    );
    assert_eq!(
        std::fs::read_to_string(expected).unwrap(),
        "Giải pháp thiết kế"
    );
}

#[tokio::test]
async fn generate_error_is_alerted_and_nothing_saved() {
    let transport = Arc::new(spawn_server().await);
    let dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(FsDownloadSink::new(dir.path()));
    let alerts = RecordingAlerts::new();
    let (page, _status) = test_page();

    let outcome = GenerateController::new(transport, page, alerts.clone(), sink)
        .run()
        .await
        .unwrap();

    assert!(matches!(outcome, GenerateOutcome::Rejected(_)));
    assert_eq!(
        alerts.messages(),
        vec![r#"Lỗi: {"error":"template missing"}"#.to_string()]
    );
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn tools_link_downloads_workbook() {
    let transport: Arc<dyn Transport> = Arc::new(spawn_server().await);
    let dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(FsDownloadSink::new(dir.path()));
    let navigator = Arc::new(FetchNavigator::new(transport, sink));

    StaticDownloadLink::new(navigator).run().await.unwrap();

    let saved = dir.path().join("BoMau_VisualDashboards_UyViet.xlsx");
    assert_eq!(std::fs::read(saved).unwrap(), b"xlsx-bytes");
}

#[tokio::test]
async fn tools_link_reports_missing_route() {
    let transport: Arc<dyn Transport> = Arc::new(spawn_server().await);
    let dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(FsDownloadSink::new(dir.path()));
    let navigator = FetchNavigator::new(transport, sink);

    let result = uyviet_desk::ui::Navigator::navigate(&navigator, "/api/missing").await;

    assert!(matches!(
        result,
        Err(uyviet_desk::ui::NavigationError::Status(StatusCode::NOT_FOUND))
    ));
}
