//! The three page actions.
//!
//! Each controller runs one linear request/response sequence against the
//! handles it was given. Server-reported problems become alerts and an
//! `Ok` outcome; transport and decode failures are returned to the caller.

mod generate;
mod tools;
mod upload;

pub use generate::{GenerateController, GenerateOutcome};
pub use tools::StaticDownloadLink;
pub use upload::{UploadController, UploadOutcome};

use thiserror::Error;

use crate::api::ApiError;
use crate::ui::NavigationError;

/// Failures a controller does not turn into an alert.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to save {filename}: {source}")]
    Save {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Navigation failed: {0}")]
    Navigation(#[from] NavigationError),
}
