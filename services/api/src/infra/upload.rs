use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use uuid::Uuid;

use crate::domain::repository::ImageStore;
use crate::domain::types::ImageUpload;
use crate::error::ApiError;

/// Writes uploaded images into one directory, served under `/uploads`.
#[derive(Debug, Clone)]
pub struct DiskImageStore {
    dir: Arc<PathBuf>,
}

impl DiskImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Arc::new(dir.into()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(self.dir.as_path())
            .await
            .with_context(|| format!("create upload dir {}", self.dir.display()))
    }
}

fn clean_ext(raw: &str) -> Option<String> {
    let ext = raw.to_ascii_lowercase();
    (!ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .then_some(ext)
}

/// Extension for the stored file: taken from the client filename, else from
/// the content type's subtype (`image/svg+xml` → `svg`).
fn extension_for(upload: &ImageUpload) -> String {
    upload
        .file_name
        .as_deref()
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .and_then(clean_ext)
        .or_else(|| {
            upload
                .content_type
                .split_once('/')
                .and_then(|(_, sub)| sub.split(['+', ';']).next())
                .and_then(clean_ext)
        })
        .unwrap_or_else(|| "img".to_owned())
}

impl ImageStore for DiskImageStore {
    async fn save_all(&self, uploads: Vec<ImageUpload>) -> Result<Vec<String>, ApiError> {
        if uploads.is_empty() {
            return Ok(Vec::new());
        }
        self.ensure_dir().await?;

        let mut names = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let name = format!("{}.{}", Uuid::now_v7(), extension_for(&upload));
            let path = self.dir.join(&name);
            tokio::fs::write(&path, &upload.bytes)
                .await
                .with_context(|| format!("write upload {}", path.display()))?;
            tracing::debug!(file = %name, bytes = upload.bytes.len(), "image stored");
            names.push(name);
        }
        Ok(names)
    }

    async fn remove_all(&self, names: &[String]) {
        for name in names {
            let path = self.dir.join(name);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => tracing::debug!(file = %name, "image removed"),
                Err(e) => tracing::warn!(file = %name, error = %e, "failed to remove image"),
            }
        }
    }
}
