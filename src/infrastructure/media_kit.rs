use crate::error::{BookingError, Result};
use std::path::PathBuf;

/// Read-only directory of downloadable media-kit PDFs.
#[derive(Debug, Clone)]
pub struct MediaKitLibrary {
    dir: PathBuf,
}

/// Accepts a bare `*.pdf` file name; anything that could leave the directory is refused.
fn checked_name(file_name: &str) -> Result<&str> {
    let valid = !file_name.is_empty()
        && file_name.len() <= 128
        && file_name.to_ascii_lowercase().ends_with(".pdf")
        && !file_name.starts_with('.')
        && file_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(file_name)
    } else {
        Err(BookingError::ValidationError(format!(
            "invalid media kit file name: {file_name}"
        )))
    }
}

impl MediaKitLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn read(&self, file_name: &str) -> Result<Vec<u8>> {
        let name = checked_name(file_name)?;
        match tokio::fs::read(self.dir.join(name)).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(BookingError::NotFound(format!("media kit {name}")))
            }
            Err(err) => Err(err.into()),
        }
    }
}
