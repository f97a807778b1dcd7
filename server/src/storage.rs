//! Attachment persistence: write uploaded bytes under the upload dir with a
//! generated collision-free name and hand back the metadata. Transactional
//! reconciliation (deleting the file when the surrounding DB work fails) is
//! the caller's responsibility.

use std::path::Path;

use uuid::Uuid;

#[derive(Debug)]
pub enum StorageError {
    Write(std::io::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Write(e) => write!(f, "failed to write upload: {e}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Metadata for a freshly written upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedUpload {
    pub filename: Option<String>,
    pub saved_name: String,
    pub file_path: String,
    pub content_type: Option<String>,
    pub extension: String,
}

/// Extension including the leading dot (`".pdf"`), or `""` when the filename
/// is absent or has no dot.
pub fn file_extension(filename: Option<&str>) -> String {
    match filename.and_then(|name| name.rfind('.').map(|idx| &name[idx..])) {
        Some(ext) => ext.to_string(),
        None => String::new(),
    }
}

/// Write `bytes` to `<upload_dir>/<uuid><ext>`, creating the directory if
/// missing. The generated name never collides regardless of original-name
/// reuse.
pub async fn save_upload(
    upload_dir: &Path,
    bytes: &[u8],
    original_filename: Option<&str>,
    content_type: Option<&str>,
) -> Result<SavedUpload, StorageError> {
    let extension = file_extension(original_filename);
    let saved_name = format!("{}{}", Uuid::new_v4(), extension);
    let path = upload_dir.join(&saved_name);

    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(StorageError::Write)?;
    tokio::fs::write(&path, bytes)
        .await
        .map_err(StorageError::Write)?;

    Ok(SavedUpload {
        filename: original_filename.map(str::to_string),
        saved_name,
        file_path: path.to_string_lossy().into_owned(),
        content_type: content_type.map(str::to_string),
        extension,
    })
}

/// Best-effort removal of a written upload (rollback reconciliation).
pub async fn remove_upload(file_path: &str) {
    if let Err(e) = tokio::fs::remove_file(file_path).await {
        tracing::warn!(path = %file_path, error = %e, "could not remove orphaned upload");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("uploads-test-{}", Uuid::new_v4()))
    }

    #[test]
    fn extension_from_last_dot() {
        assert_eq!(file_extension(Some("photo.jpg")), ".jpg");
        assert_eq!(file_extension(Some("archive.tar.gz")), ".gz");
    }

    #[test]
    fn extension_empty_without_dot_or_name() {
        assert_eq!(file_extension(Some("myfile")), "");
        assert_eq!(file_extension(None), "");
    }

    #[tokio::test]
    async fn same_original_name_gets_distinct_saved_names() {
        let dir = scratch_dir();

        let a = save_upload(&dir, b"first", Some("photo.jpg"), Some("image/jpeg"))
            .await
            .unwrap();
        let b = save_upload(&dir, b"second", Some("photo.jpg"), Some("image/jpeg"))
            .await
            .unwrap();

        assert_ne!(a.saved_name, b.saved_name);
        assert_eq!(tokio::fs::read(&a.file_path).await.unwrap(), b"first");
        assert_eq!(tokio::fs::read(&b.file_path).await.unwrap(), b"second");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn no_extension_means_no_trailing_dot() {
        let dir = scratch_dir();

        let saved = save_upload(&dir, b"bytes", Some("myfile"), None).await.unwrap();
        assert_eq!(saved.extension, "");
        assert!(!saved.saved_name.ends_with('.'));
        assert_eq!(saved.filename.as_deref(), Some("myfile"));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn remove_upload_deletes_the_file() {
        let dir = scratch_dir();

        let saved = save_upload(&dir, b"bytes", Some("doc.pdf"), None).await.unwrap();
        remove_upload(&saved.file_path).await;
        assert!(tokio::fs::metadata(&saved.file_path).await.is_err());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
