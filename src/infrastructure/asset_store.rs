use crate::domain::ports::{AssetStore, UploadedAsset};
use crate::error::{BookingError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const ASSET_DIR: &str = "uploaded_videos";
const FALLBACK_EXTENSION: &str = "bin";

/// Writes uploaded booking videos under `<root>/uploaded_videos/`.
#[derive(Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

fn extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn save(&self, asset: UploadedAsset) -> Result<String> {
        let dir = self.root.join(ASSET_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!(
            "{}.{}",
            Uuid::new_v4().simple(),
            extension(asset.file_name.as_deref())
        );
        tokio::fs::write(dir.join(&file_name), &asset.bytes).await?;

        tracing::debug!(file = %file_name, bytes = asset.bytes.len(), "stored uploaded asset");
        Ok(format!("{ASSET_DIR}/{file_name}"))
    }

    async fn remove(&self, reference: &str) -> Result<()> {
        let file_name = reference
            .strip_prefix(ASSET_DIR)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
            .ok_or_else(|| BookingError::ValidationError(format!("not an asset reference: {reference}")))?;
        tokio::fs::remove_file(self.root.join(ASSET_DIR).join(file_name)).await?;
        tracing::debug!(file = %file_name, "removed uploaded asset");
        Ok(())
    }
}
