use thiserror::Error;

/// Upload size cap, matching the server's 16 MiB request limit.
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// File types the server's ingestion step accepts.
pub const ALLOWED_UPLOAD_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("\"{filename}\" is not a supported file type (CSV, XLSX or XLS)")]
    UnsupportedType { filename: String },
    #[error("\"{filename}\" is {size_bytes} bytes; uploads are limited to {limit} bytes")]
    TooLarge {
        filename: String,
        size_bytes: u64,
        limit: u64,
    },
}

/// Validates an upload candidate by name and size before it may be stored
/// as the run's data source.
pub fn validate_upload(filename: &str, size_bytes: u64) -> Result<(), UploadError> {
    let extension = filename.rsplit_once('.').map(|(_, ext)| ext);
    let allowed = extension.is_some_and(|ext| {
        ALLOWED_UPLOAD_EXTENSIONS
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(ext))
    });
    if !allowed {
        return Err(UploadError::UnsupportedType {
            filename: filename.to_string(),
        });
    }
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            filename: filename.to_string(),
            size_bytes,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}
