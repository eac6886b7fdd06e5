//! Filesystem-backed downloads.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use console::{style, Term};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::{DownloadSink, NavigationError, Navigator};
use crate::api::{resolve_filename, GeneratedDocument, Transport};

/// Saves downloads into a directory.
///
/// Bytes go to a temporary file next to the target first; the temporary file
/// is removed on drop unless it was persisted under its final name.
pub struct FsDownloadSink {
    dir: PathBuf,
    announce: bool,
}

impl FsDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            announce: false,
        }
    }

    /// Print the saved path to stderr after each download.
    pub fn announcing(mut self) -> Self {
        self.announce = true;
        self
    }
}

/// Write `bytes` to `dir/filename` through a temporary file in `dir`.
fn write_atomic(dir: &Path, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let target = dir.join(filename);

    let mut tmp = NamedTempFile::new_in(dir)?;
    debug!("Writing {} bytes to {}", bytes.len(), tmp.path().display());
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(&target).map_err(|e| e.error)?;

    Ok(target)
}

#[async_trait]
impl DownloadSink for FsDownloadSink {
    async fn save(&self, document: &GeneratedDocument) -> std::io::Result<PathBuf> {
        let dir = self.dir.clone();
        let filename = document.filename.clone();
        let bytes = document.bytes.clone();
        let path = tokio::task::spawn_blocking(move || write_atomic(&dir, &filename, &bytes))
            .await
            .map_err(std::io::Error::other)??;
        info!("Saved {} ({} bytes)", path.display(), document.bytes.len());

        if self.announce {
            let _ = Term::stderr().write_line(&format!(
                "{} {}",
                style("Saved").green().bold(),
                path.display()
            ));
        }
        Ok(path)
    }
}

/// Navigates by fetching the target and handing it to a download sink,
/// the way a browser treats an attachment response.
pub struct FetchNavigator {
    transport: Arc<dyn Transport>,
    sink: Arc<dyn DownloadSink>,
}

impl FetchNavigator {
    pub fn new(transport: Arc<dyn Transport>, sink: Arc<dyn DownloadSink>) -> Self {
        Self { transport, sink }
    }
}

/// Last non-empty path segment, used when the server names nothing.
fn fallback_name(path: &str) -> &str {
    path.split(['?', '#'])
        .next()
        .and_then(|p| p.rsplit('/').find(|s| !s.is_empty()))
        .unwrap_or("download")
}

#[async_trait]
impl Navigator for FetchNavigator {
    async fn navigate(&self, path: &str) -> Result<(), NavigationError> {
        let response = self.transport.get(path).await?;
        if !response.is_success() {
            return Err(NavigationError::Status(response.status));
        }

        let filename = resolve_filename(response.content_disposition(), fallback_name(path));
        let document = GeneratedDocument {
            filename,
            bytes: response.body,
        };
        self.sink.save(&document).await?;
        Ok(())
    }
}
