use crate::domain::lead::{Lead, LeadForm, MediaKitDownload};
use crate::domain::ports::LeadStoreBox;
use crate::error::{BookingError, Result};
use crate::infrastructure::lead_log::LeadLog;
use crate::infrastructure::media_kit::MediaKitLibrary;
use chrono::Utc;

/// Collects download leads and tracks free media-kit downloads.
///
/// The text log is a side channel: write failures are logged and never fail
/// the caller.
pub struct LeadCapture {
    store: LeadStoreBox,
    log: Option<LeadLog>,
    download_url: String,
    media_kit: Option<MediaKitLibrary>,
}

impl LeadCapture {
    pub fn new(store: LeadStoreBox, log: Option<LeadLog>, download_url: impl Into<String>) -> Self {
        Self {
            store,
            log,
            download_url: download_url.into(),
            media_kit: None,
        }
    }

    pub fn with_media_kit(mut self, library: MediaKitLibrary) -> Self {
        self.media_kit = Some(library);
        self
    }

    /// Stores the lead and returns the download URL it unlocks.
    pub async fn capture(&self, form: LeadForm) -> Result<String> {
        let lead = form.into_lead()?;
        let line = lead.log_line();
        let source = lead.source.clone();
        self.store.create(lead).await?;
        self.append(&line).await;
        tracing::info!(%source, "lead captured");
        Ok(self.download_url.clone())
    }

    pub async fn track_download(&self, download: &MediaKitDownload) {
        self.append(&download.log_line(Utc::now())).await;
        tracing::info!(pdf = %download.pdf_name, "media kit download tracked");
    }

    /// Returns the media-kit file and records the download.
    pub async fn download_media_kit(&self, file_name: &str) -> Result<Vec<u8>> {
        let library = self
            .media_kit
            .as_ref()
            .ok_or_else(|| BookingError::NotFound(format!("media kit {file_name}")))?;
        let bytes = library.read(file_name).await?;

        let download = MediaKitDownload {
            pdf_name: file_name.to_string(),
            file_size_mb: Some(bytes.len() as f64 / (1024.0 * 1024.0)),
        };
        self.track_download(&download).await;
        Ok(bytes)
    }

    /// Captured leads, oldest first.
    pub async fn leads(&self) -> Result<Vec<Lead>> {
        self.store.list().await
    }

    async fn append(&self, line: &str) {
        if let Some(log) = &self.log
            && let Err(err) = log.append(line).await
        {
            tracing::warn!(path = %log.path().display(), error = %err, "lead log write failed");
        }
    }
}
