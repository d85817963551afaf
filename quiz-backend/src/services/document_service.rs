use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Result<Self> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "txt" => Ok(DocumentKind::Text),
            _ => Err(Error::UnsupportedFileType { ext }),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Text => "txt",
        }
    }
}

#[derive(Clone, Debug)]
pub struct DocumentService {
    upload_dir: PathBuf,
}

impl DocumentService {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    /// Stores the upload under a temporary name, extracts its text and removes the file again.
    pub async fn extract_text(&self, filename: &str, data: &[u8]) -> Result<String> {
        let kind = DocumentKind::from_filename(filename)?;
        if data.is_empty() {
            return Err(Error::BadRequest("Uploaded document is empty".into()));
        }
        if kind == DocumentKind::Pdf && !data.starts_with(b"%PDF") {
            return Err(Error::BadRequest("Invalid PDF file content".into()));
        }

        let path = self.save_upload(kind, data).await?;
        let result = extract_text_from_file(&path, kind).await;

        if let Err(e) = fs::remove_file(&path).await {
            tracing::error!("Failed to remove uploaded file {}: {}", path.display(), e);
        }

        result
    }

    async fn save_upload(&self, kind: DocumentKind, data: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.upload_dir).await?;

        let path = self
            .upload_dir
            .join(format!("document-{}.{}", uuid::Uuid::new_v4(), kind.extension()));

        fs::write(&path, data).await.map_err(|e| {
            tracing::error!("Failed to write uploaded document: {}", e);
            Error::Internal(format!("Failed to save file: {}", e))
        })?;

        Ok(path)
    }
}

pub async fn extract_text_from_file(path: &Path, kind: DocumentKind) -> Result<String> {
    match kind {
        DocumentKind::Pdf => {
            let output = Command::new("pdftotext")
                .arg("-layout")
                .arg(path)
                .arg("-")
                .output()
                .await
                .map_err(|e| {
                    tracing::error!("Failed to run pdftotext on {}: {}", path.display(), e);
                    Error::Extraction("pdftotext is not available".into())
                })?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                tracing::error!("pdftotext failed: {}", stderr);
                return Err(Error::Extraction(format!(
                    "Could not read PDF: {}",
                    stderr.trim()
                )));
            }

            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        DocumentKind::Text => {
            let bytes = fs::read(path).await?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}
