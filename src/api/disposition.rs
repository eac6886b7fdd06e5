//! Download filename resolution from `Content-Disposition`.

use tracing::debug;

/// Name given to a generated document when the server does not provide one.
pub const DEFAULT_DOCUMENT_FILENAME: &str = "UyViet_GiaiPhap.docx";

/// Parse filename from Content-Disposition header value.
/// Parses both `filename="name.docx"` and `filename*=UTF-8''name.docx` formats.
/// Only the last path component is kept; empty, `.` and `..` names yield `None`.
pub fn parse_content_disposition_filename(header: &str) -> Option<String> {
    if let Some(start) = header.find("filename*=") {
        let rest = &header[start + 10..];
        if let Some(quote_start) = rest.find("''") {
            let encoded = rest[quote_start + 2..].split([';', ' ']).next()?;
            if let Ok(decoded) = urlencoding::decode(encoded) {
                if let Some(name) = safe_filename(decoded.trim_matches('"')) {
                    return Some(name);
                }
            }
        }
    }

    let start = header.find("filename=")?;
    let rest = &header[start + 9..];
    let raw = match rest.trim_start().strip_prefix('"') {
        Some(quoted) => quoted.split('"').next().unwrap_or_default(),
        None => rest.split(';').next().unwrap_or_default(),
    };

    safe_filename(&raw.replace('"', ""))
}

/// Keep only the last path component, rejecting names that resolve to nothing.
fn safe_filename(name: &str) -> Option<String> {
    let name = name.trim().rsplit(['/', '\\']).next()?.trim();
    match name {
        "" | "." | ".." => None,
        _ => Some(name.to_string()),
    }
}

/// Resolve the filename for a download, falling back to `default` when the
/// header is missing or yields no usable name.
pub fn resolve_filename(header: Option<&str>, default: &str) -> String {
    match header.and_then(parse_content_disposition_filename) {
        Some(name) => name,
        None => {
            debug!(?header, fallback = default, "No filename in content-disposition");
            default.to_string()
        }
    }
}
