use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use super::ControllerError;
use crate::api::{
    resolve_filename, ApiError, GeneratedDocument, GenerationRequest, ProjectMeta, Transport,
    DEFAULT_DOCUMENT_FILENAME, GENERATE_PATH,
};
use crate::ui::{ids, messages, Alerts, DownloadSink, Page};

/// What a generate action ended with.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    /// The document was handed to the download sink.
    Downloaded { filename: String, location: PathBuf },
    /// The server answered with an error body; nothing was saved.
    Rejected(serde_json::Value),
}

/// Renders the current preview and fields into a document and downloads it.
pub struct GenerateController {
    transport: Arc<dyn Transport>,
    page: Page,
    alerts: Arc<dyn Alerts>,
    sink: Arc<dyn DownloadSink>,
}

impl GenerateController {
    pub fn new(
        transport: Arc<dyn Transport>,
        page: Page,
        alerts: Arc<dyn Alerts>,
        sink: Arc<dyn DownloadSink>,
    ) -> Self {
        Self {
            transport,
            page,
            alerts,
            sink,
        }
    }

    /// Element id of the button this controller is bound to.
    pub fn trigger_id(&self) -> &'static str {
        ids::BTN_GENERATE
    }

    /// Snapshot the page into a request body.
    pub async fn build_request(&self) -> GenerationRequest {
        let meta = ProjectMeta::new(
            self.page.project.value().await,
            self.page.client.value().await,
            self.page.location.value().await,
            self.page.scale.value().await,
        );

        GenerationRequest {
            content: self.page.preview.value().await,
            meta,
        }
    }

    pub async fn run(&self) -> Result<GenerateOutcome, ControllerError> {
        let request = self.build_request().await;
        info!(
            "Generating document for {:?} ({} chars)",
            request.meta.project_short,
            request.content.chars().count()
        );

        let body = serde_json::to_value(&request).map_err(ApiError::from)?;
        let response = self.transport.post_json(GENERATE_PATH, &body).await?;

        if !response.is_success() {
            let error: serde_json::Value = response.json()?;
            warn!("Generation failed with HTTP {}: {}", response.status, error);
            self.alerts
                .alert(&format!("{}{}", messages::ERROR_PREFIX, error));
            return Ok(GenerateOutcome::Rejected(error));
        }

        let filename = resolve_filename(response.content_disposition(), DEFAULT_DOCUMENT_FILENAME);
        let document = GeneratedDocument {
            filename,
            bytes: response.body,
        };

        let location = self
            .sink
            .save(&document)
            .await
            .map_err(|source| ControllerError::Save {
                filename: document.filename.clone(),
                source,
            })?;

        Ok(GenerateOutcome::Downloaded {
            filename: document.filename,
            location,
        })
    }
}
