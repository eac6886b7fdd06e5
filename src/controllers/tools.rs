use std::sync::Arc;

use tracing::info;

use super::ControllerError;
use crate::api::DOWNLOAD_TOOLS_PATH;
use crate::ui::{ids, Navigator};

/// Link to the static tools workbook; the navigator does all the work.
pub struct StaticDownloadLink {
    navigator: Arc<dyn Navigator>,
}

impl StaticDownloadLink {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }

    /// Element id of the button this link is bound to.
    pub fn trigger_id(&self) -> &'static str {
        ids::BTN_DOWNLOAD_EXCEL
    }

    pub async fn run(&self) -> Result<(), ControllerError> {
        info!("Navigating to {}", DOWNLOAD_TOOLS_PATH);
        self.navigator.navigate(DOWNLOAD_TOOLS_PATH).await?;
        Ok(())
    }
}
