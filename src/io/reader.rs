//! Bounded-size, UTF-8 file reading.
//!
//! Reads are capped before any bytes are pulled in: the file is stat'ed
//! first and oversized files are rejected without a read. Failures carry
//! the observed size so per-file metadata stays accurate even when the
//! content is never used.

use std::path::Path;

use crate::core::errors::ContextError;

/// A successful bounded read.
#[derive(Debug)]
pub struct BoundedRead {
    /// Decoded file content
    pub content: String,
    /// File size in bytes
    pub size: u64,
}

/// A failed bounded read, with whatever size was observed before failing.
#[derive(Debug)]
pub struct ReadFailure {
    /// File size in bytes, 0 if the file was never stat'ed
    pub size: u64,
    /// What went wrong
    pub error: ContextError,
}

/// Read `path` as UTF-8 text, failing if it exceeds `max_size` bytes or
/// decodes to whitespace only.
pub async fn read_bounded(
    path: &Path,
    kind: &str,
    max_size: u64,
) -> std::result::Result<BoundedRead, ReadFailure> {
    let metadata = tokio::fs::metadata(path).await.map_err(|e| ReadFailure {
        size: 0,
        error: ContextError::parse(kind, format!("read error: {e}")),
    })?;
    let size = metadata.len();

    if size > max_size {
        return Err(ReadFailure {
            size,
            error: ContextError::parse(
                kind,
                format!("file too large: {size} bytes (max: {max_size})"),
            ),
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| ReadFailure {
        size,
        error: ContextError::parse(kind, format!("read error: {e}")),
    })?;

    let content = String::from_utf8(bytes).map_err(|_| ReadFailure {
        size,
        error: ContextError::parse(kind, "file is not valid UTF-8"),
    })?;

    if content.trim().is_empty() {
        return Err(ReadFailure {
            size,
            error: ContextError::parse(kind, "file is empty"),
        });
    }

    Ok(BoundedRead { content, size })
}
