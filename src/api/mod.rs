//! Client side of the drafting service API.

mod client;
pub mod disposition;
pub mod models;

pub use client::{ApiError, ApiResponse, HttpClient, Transport};
pub use disposition::{resolve_filename, DEFAULT_DOCUMENT_FILENAME};
pub use models::{
    derive_project_short, ExtractedFields, ExtractionResponse, ExtractionResult,
    GeneratedDocument, GenerationRequest, ProjectMeta, SelectedFile,
};

/// Extraction endpoint.
pub const UPLOAD_PATH: &str = "/api/upload";
/// Generation endpoint.
pub const GENERATE_PATH: &str = "/api/generate";
/// Static tools workbook.
pub const DOWNLOAD_TOOLS_PATH: &str = "/api/download_tools";

/// Multipart field name carrying the uploaded document.
pub const UPLOAD_FIELD: &str = "file";
