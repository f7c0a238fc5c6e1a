//! In-memory byte payloads and the file loader that produces them.

use std::path::Path;

use bytes::Bytes;
use tokio::io::AsyncReadExt;
use tracing::{debug, error};

use crate::error::PogodocError;

/// A fully buffered byte payload, consumed by a single upload.
///
/// Construction does not reject empty content; uploading an empty payload
/// fails with a validation error before any network activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    bytes: Bytes,
}

impl FilePayload {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        FilePayload {
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Cheap handle to the underlying buffer, suitable as a request body.
    pub fn bytes(&self) -> Bytes {
        self.bytes.clone()
    }
}

impl From<Vec<u8>> for FilePayload {
    fn from(bytes: Vec<u8>) -> Self {
        FilePayload::new(bytes)
    }
}

impl From<String> for FilePayload {
    fn from(text: String) -> Self {
        FilePayload::new(text)
    }
}

/// Resolves `path` to an absolute path and reads the whole file into memory.
///
/// The file handle is closed before the payload is returned. Empty files are
/// rejected with [`PogodocError::EmptyFile`].
pub async fn load_file(path: impl AsRef<Path>) -> Result<FilePayload, PogodocError> {
    let path = path.as_ref();
    let absolute = std::path::absolute(path).map_err(|source| {
        error!(error = ?source, path = %path.display(), "Failed to resolve absolute path");
        PogodocError::PathResolution {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let mut file = tokio::fs::File::open(&absolute).await.map_err(|source| {
        error!(error = ?source, path = %absolute.display(), "Failed to open file");
        PogodocError::Open {
            path: absolute.clone(),
            source,
        }
    })?;

    let mut buf = Vec::new();
    file.read_to_end(&mut buf).await.map_err(|source| {
        error!(error = ?source, path = %absolute.display(), "Failed to read file");
        PogodocError::Read {
            path: absolute.clone(),
            source,
        }
    })?;
    drop(file);

    if buf.is_empty() {
        error!(path = %absolute.display(), "File is empty");
        return Err(PogodocError::EmptyFile { path: absolute });
    }

    debug!(path = %absolute.display(), bytes = buf.len(), "Loaded file payload");
    Ok(FilePayload::from(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn loads_whole_file() {
        let mut file = NamedTempFile::new().expect("tmp file");
        file.write_all(b"PK\x03\x04abcd").expect("write");

        let payload = load_file(file.path()).await.expect("load");
        assert_eq!(payload.len(), 8);
        assert_eq!(payload.as_bytes(), b"PK\x03\x04abcd");
    }

    #[tokio::test]
    async fn rejects_empty_file() {
        let file = NamedTempFile::new().expect("tmp file");

        let err = load_file(file.path()).await.expect_err("empty file");
        assert!(matches!(err, PogodocError::EmptyFile { .. }));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[tokio::test]
    async fn missing_file_is_an_open_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let err = load_file(dir.path().join("missing.zip"))
            .await
            .expect_err("missing file");
        assert!(matches!(err, PogodocError::Open { .. }));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[tokio::test]
    async fn empty_path_fails_resolution() {
        let err = load_file("").await.expect_err("empty path");
        assert!(matches!(err, PogodocError::PathResolution { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn relative_paths_resolve_against_cwd() {
        let mut file = NamedTempFile::new().expect("tmp file");
        file.write_all(b"zip").expect("write");

        // Climb from the working directory to the root, then descend to the file.
        let cwd = std::env::current_dir().expect("cwd");
        let up: std::path::PathBuf = cwd.components().skip(1).map(|_| "..").collect();
        let relative = up.join(file.path().strip_prefix("/").expect("absolute tmp path"));
        assert!(relative.is_relative());

        let payload = load_file(&relative).await.expect("load relative");
        assert_eq!(payload.as_bytes(), b"zip");
    }
}
