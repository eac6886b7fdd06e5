//! Recording test doubles for the controller seams.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;

use uyviet_desk::api::{ApiError, ApiResponse, GeneratedDocument, SelectedFile, Transport};
use uyviet_desk::ui::{ids, Alerts, DownloadSink, Field, NavigationError, Navigator, Page};

/// A request the mock transport received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    File {
        path: String,
        field: String,
        name: String,
    },
    Json {
        path: String,
        body: serde_json::Value,
    },
    Get {
        path: String,
    },
}

/// Replays responses queued per path and records every request.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, VecDeque<Result<ApiResponse, ApiError>>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn queue(&self, path: &str, response: Result<ApiResponse, ApiError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn respond(&self, path: &str, response: ApiResponse) {
        self.queue(path, Ok(response));
    }

    pub fn respond_json(&self, path: &str, status: StatusCode, body: serde_json::Value) {
        self.respond(
            path,
            ApiResponse::new(status, body.to_string())
                .with_header("Content-Type", "application/json"),
        );
    }

    pub fn fail(&self, path: &str, error: ApiError) {
        self.queue(path, Err(error));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self, path: &str, call: Call) -> Result<ApiResponse, ApiError> {
        self.calls.lock().unwrap().push(call);
        self.responses
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| panic!("no response queued for {path}"))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_file(
        &self,
        path: &str,
        field: &str,
        file: &SelectedFile,
    ) -> Result<ApiResponse, ApiError> {
        self.next(path, Call::File {
            path: path.to_string(),
            field: field.to_string(),
            name: file.name.clone(),
        })
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<ApiResponse, ApiError> {
        self.next(path, Call::Json {
            path: path.to_string(),
            body: body.clone(),
        })
    }

    async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.next(path, Call::Get {
            path: path.to_string(),
        })
    }
}

#[derive(Default)]
pub struct RecordingAlerts {
    messages: Mutex<Vec<String>>,
}

impl RecordingAlerts {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Alerts for RecordingAlerts {
    fn alert(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Keeps downloads in memory, reporting a fake location.
#[derive(Default)]
pub struct RecordingSink {
    saved: Mutex<Vec<GeneratedDocument>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn saved(&self) -> Vec<GeneratedDocument> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl DownloadSink for RecordingSink {
    async fn save(&self, document: &GeneratedDocument) -> std::io::Result<PathBuf> {
        self.saved.lock().unwrap().push(document.clone());
        Ok(PathBuf::from("/downloads").join(&document.filename))
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn navigate(&self, path: &str) -> Result<(), NavigationError> {
        self.visited.lock().unwrap().push(path.to_string());
        Ok(())
    }
}

/// A page whose status label is a plain field the test can read back.
pub fn test_page() -> (Page, Field) {
    let status = Field::new(ids::FILE_INFO);
    (Page::new(Arc::new(status.clone())), status)
}

pub fn pdf(name: &str) -> SelectedFile {
    SelectedFile::new(name, "application/pdf", b"%PDF-1.7 test".to_vec())
}
