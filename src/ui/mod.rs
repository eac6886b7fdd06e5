//! Named UI handles the controllers read and write.
//!
//! Each handle carries the element id of the page it stands for, so a
//! front end can bind them to whatever actually renders the page:
//! - `Field`: a text-bearing element (input value, preview, label)
//! - `FileInput`: the file chooser
//! - `Label`, `Alerts`, `DownloadSink`, `Navigator`: side-effect seams

pub mod files;
pub mod terminal;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::api::{ApiError, GeneratedDocument, SelectedFile};

pub use files::{FetchNavigator, FsDownloadSink};
pub use terminal::{ConsoleAlerts, SpinnerLabel};

/// Element ids of the page contract.
pub mod ids {
    pub const FILE_INPUT: &str = "fileInput";
    pub const BTN_EXTRACT: &str = "btnExtract";
    pub const FILE_INFO: &str = "fileInfo";
    pub const PREVIEW: &str = "preview";
    pub const PROJECT: &str = "project";
    pub const CLIENT: &str = "client";
    pub const LOCATION: &str = "location";
    pub const SCALE: &str = "scale";
    pub const BTN_GENERATE: &str = "btnGenerate";
    pub const BTN_DOWNLOAD_EXCEL: &str = "btnDownloadExcel";
}

/// User-facing texts.
pub mod messages {
    pub const NO_FILE_SELECTED: &str = "Chọn file trước";
    pub const SENDING_FILE: &str = "Đang gửi file...";
    pub const EXTRACT_DONE: &str = "Extract xong";
    pub const ERROR_PREFIX: &str = "Lỗi: ";
}

/// A text-bearing element shared between controllers.
#[derive(Debug, Clone)]
pub struct Field {
    id: &'static str,
    value: Arc<RwLock<String>>,
}

impl Field {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            value: Arc::new(RwLock::new(String::new())),
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub async fn value(&self) -> String {
        self.value.read().await.clone()
    }

    pub async fn set_value(&self, value: impl Into<String>) {
        *self.value.write().await = value.into();
    }
}

/// The file chooser; holds at most one selected file.
#[derive(Debug, Clone, Default)]
pub struct FileInput {
    selected: Arc<RwLock<Option<Arc<SelectedFile>>>>,
}

impl FileInput {
    pub fn id(&self) -> &'static str {
        ids::FILE_INPUT
    }

    pub async fn select(&self, file: SelectedFile) {
        *self.selected.write().await = Some(Arc::new(file));
    }

    pub async fn clear(&self) {
        *self.selected.write().await = None;
    }

    pub async fn selected(&self) -> Option<Arc<SelectedFile>> {
        self.selected.read().await.clone()
    }
}

/// A status line the user watches while a request is in flight.
#[async_trait]
pub trait Label: Send + Sync {
    async fn set_text(&self, text: &str);
}

#[async_trait]
impl Label for Field {
    async fn set_text(&self, text: &str) {
        self.set_value(text).await;
    }
}

/// Blocking, user-visible notifications.
pub trait Alerts: Send + Sync {
    fn alert(&self, message: &str);
}

/// Where generated documents end up.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Store the document and return where it landed.
    async fn save(&self, document: &GeneratedDocument) -> std::io::Result<PathBuf>;
}

/// Errors surfaced by a navigator.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Server answered HTTP {0}")]
    Status(StatusCode),

    #[error("Failed to save download: {0}")]
    Save(#[from] std::io::Error),
}

/// Full-page navigation; whatever loads the target owns the result.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate(&self, path: &str) -> Result<(), NavigationError>;
}

/// Every handle the controllers touch.
#[derive(Clone)]
pub struct Page {
    pub file_input: FileInput,
    pub file_info: Arc<dyn Label>,
    pub preview: Field,
    pub project: Field,
    pub client: Field,
    pub location: Field,
    pub scale: Field,
}

impl Page {
    /// Build a page whose status label is rendered by `file_info`.
    pub fn new(file_info: Arc<dyn Label>) -> Self {
        Self {
            file_input: FileInput::default(),
            file_info,
            preview: Field::new(ids::PREVIEW),
            project: Field::new(ids::PROJECT),
            client: Field::new(ids::CLIENT),
            location: Field::new(ids::LOCATION),
            scale: Field::new(ids::SCALE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_field_clones_share_value() {
        let field = Field::new(ids::PROJECT);
        let other = field.clone();
        other.set_value("Acme").await;
        assert_eq!(field.value().await, "Acme");
    }

    #[tokio::test]
    async fn test_file_input_select_and_clear() {
        let input = FileInput::default();
        assert!(input.selected().await.is_none());

        input
            .select(SelectedFile::new("a.pdf", "application/pdf", b"%PDF".to_vec()))
            .await;
        assert_eq!(input.selected().await.unwrap().name, "a.pdf");

        input.clear().await;
        assert!(input.selected().await.is_none());
    }
}
