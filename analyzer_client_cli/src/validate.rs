use std::path::Path;

use crate::error::ClientError;

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

// Matches the service's FILE_MAX_MB default; oversize files are rejected
// before any network call.
pub const MAX_FILE_MB: u64 = 20;

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub size_bytes: u64,
}

/// Client-side validation of the selected file: extension and size.
pub fn validate_upload(path: &Path) -> Result<UploadFile, ClientError> {
    validate_upload_with_limit(path, MAX_FILE_MB * 1024 * 1024)
}

fn validate_upload_with_limit(path: &Path, max_bytes: u64) -> Result<UploadFile, ClientError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ClientError::UnsupportedFileType { extension });
    }

    let size_bytes = std::fs::metadata(path)?.len();
    if size_bytes > max_bytes {
        return Err(ClientError::FileTooLarge {
            path: path.to_path_buf(),
            size_mb: size_bytes as f64 / (1024.0 * 1024.0),
            limit_mb: max_bytes / (1024 * 1024),
        });
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("feedback.csv")
        .to_string();

    Ok(UploadFile { name, size_bytes })
}
