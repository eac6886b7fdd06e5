//! Wire types exchanged with the drafting service.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// Fallback for `project_short` when the project name sanitizes to nothing.
pub const DEFAULT_PROJECT_SHORT: &str = "Project";

/// Maximum length of `project_short`.
pub const PROJECT_SHORT_MAX_CHARS: usize = 30;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static NON_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid identifier pattern"));

/// A file chosen by the user, ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self { name, mime, bytes })
    }
}

/// Metadata fields inferred by the extraction endpoint.
///
/// The server also sends keys this client never displays; serde drops them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub scale: Option<String>,
}

/// Successful body of `POST /api/upload`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(default)]
    pub fields: Option<ExtractedFields>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw body of `POST /api/upload`, which may carry an `error` instead.
#[derive(Debug, Deserialize)]
pub struct ExtractionResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    result: ExtractionResult,
}

impl ExtractionResponse {
    /// Split into the server-reported error (if any) or the extraction result.
    ///
    /// An empty `error` string counts as no error.
    pub fn into_result(self) -> Result<ExtractionResult, String> {
        match self.error {
            Some(error) if !error.is_empty() => Err(error),
            _ => Ok(self.result),
        }
    }
}

/// Project metadata sent alongside the preview text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMeta {
    pub project_name: String,
    pub client: String,
    pub location: String,
    pub scale: String,
    pub project_short: String,
}

impl ProjectMeta {
    /// Build metadata from field values, deriving `project_short`.
    pub fn new(project_name: String, client: String, location: String, scale: String) -> Self {
        let project_short = derive_project_short(&project_name);
        Self {
            project_name,
            client,
            location,
            scale,
            project_short,
        }
    }
}

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub content: String,
    pub meta: ProjectMeta,
}

/// A rendered document returned by the generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Derive the short identifier the server uses in output filenames.
pub fn derive_project_short(project_name: &str) -> String {
    let underscored = WHITESPACE_RUN.replace_all(project_name.trim(), "_");
    let short: String = NON_IDENT
        .replace_all(&underscored, "")
        .chars()
        .take(PROJECT_SHORT_MAX_CHARS)
        .collect();

    if short.is_empty() {
        DEFAULT_PROJECT_SHORT.to_string()
    } else {
        short
    }
}
