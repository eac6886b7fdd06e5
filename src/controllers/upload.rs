use std::sync::Arc;

use tracing::{debug, info, warn};

use super::ControllerError;
use crate::api::{ExtractionResponse, ExtractionResult, Transport, UPLOAD_FIELD, UPLOAD_PATH};
use crate::ui::{ids, messages, Alerts, Page};

/// What an extract action ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Nothing was selected; no request was sent.
    NoFileSelected,
    /// The server refused the file with this message.
    Rejected(String),
    /// Preview and fields were updated from this result.
    Extracted(ExtractionResult),
}

/// Sends the selected file for extraction and fills the page from the result.
pub struct UploadController {
    transport: Arc<dyn Transport>,
    page: Page,
    alerts: Arc<dyn Alerts>,
}

impl UploadController {
    pub fn new(transport: Arc<dyn Transport>, page: Page, alerts: Arc<dyn Alerts>) -> Self {
        Self {
            transport,
            page,
            alerts,
        }
    }

    /// Element id of the button this controller is bound to.
    pub fn trigger_id(&self) -> &'static str {
        ids::BTN_EXTRACT
    }

    pub async fn run(&self) -> Result<UploadOutcome, ControllerError> {
        let Some(file) = self.page.file_input.selected().await else {
            self.alerts.alert(messages::NO_FILE_SELECTED);
            return Ok(UploadOutcome::NoFileSelected);
        };

        self.page.file_info.set_text(messages::SENDING_FILE).await;
        info!("Uploading {} ({} bytes, {})", file.name, file.bytes.len(), file.mime);

        let response = self
            .transport
            .post_file(UPLOAD_PATH, UPLOAD_FIELD, &file)
            .await?;
        // Rejections arrive as JSON with a 4xx/5xx status, so the status is not checked.
        let body: ExtractionResponse = response.json()?;

        let result = match body.into_result() {
            Ok(result) => result,
            Err(error) => {
                warn!("Extraction rejected {}: {}", file.name, error);
                self.alerts
                    .alert(&format!("{}{}", messages::ERROR_PREFIX, error));
                return Ok(UploadOutcome::Rejected(error));
            }
        };

        self.page.preview.set_value(result.text.as_str()).await;
        if let Some(fields) = &result.fields {
            let targets = [
                (&fields.project_name, &self.page.project),
                (&fields.client, &self.page.client),
                (&fields.location, &self.page.location),
                (&fields.scale, &self.page.scale),
            ];
            for (value, field) in targets {
                match value.as_deref() {
                    Some(v) if !v.is_empty() => field.set_value(v).await,
                    _ => debug!("No value extracted for {}", field.id()),
                }
            }
        }

        self.page.file_info.set_text(messages::EXTRACT_DONE).await;
        info!("Extracted {} chars from {}", result.text.chars().count(), file.name);

        Ok(UploadOutcome::Extracted(result))
    }
}
