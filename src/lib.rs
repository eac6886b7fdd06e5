//! Client for the Uy Viet document drafting service.
//!
//! Upload a source document for extraction, review and edit the extracted
//! text and project fields, then have the service render a proposal
//! document and save it locally.

pub mod api;
pub mod config;
pub mod controllers;
pub mod ui;

pub use api::{HttpClient, Transport};
pub use config::Settings;
pub use controllers::{
    ControllerError, GenerateController, GenerateOutcome, StaticDownloadLink, UploadController,
    UploadOutcome,
};
pub use ui::Page;
