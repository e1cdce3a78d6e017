use crate::error::BookingError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_LEAD_SOURCE: &str = "download";

/// Contact details left in exchange for a free download.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub source: String,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub source: Option<String>,
}

impl LeadForm {
    pub fn into_lead(self) -> Result<Lead, BookingError> {
        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(BookingError::ValidationError(
                "Name and email are required".to_string(),
            ));
        }

        let non_blank = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Lead {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            phone: non_blank(self.phone),
            source: non_blank(self.source).unwrap_or_else(|| DEFAULT_LEAD_SOURCE.to_string()),
            captured_at: Utc::now(),
        })
    }
}

impl Lead {
    /// One line of the append-only lead log.
    pub fn log_line(&self) -> String {
        format!(
            "{} - {} ({}) - {}\n",
            self.captured_at.to_rfc3339(),
            self.name,
            self.email,
            self.phone.as_deref().unwrap_or("N/A")
        )
    }
}

/// A tracked free media-kit download.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaKitDownload {
    pub pdf_name: String,
    #[serde(default)]
    pub file_size_mb: Option<f64>,
}

impl MediaKitDownload {
    pub fn log_line(&self, at: DateTime<Utc>) -> String {
        match self.file_size_mb {
            Some(size) => format!("{} - MEDIAKIT {} ({size} MB)\n", at.to_rfc3339(), self.pdf_name),
            None => format!("{} - MEDIAKIT {}\n", at.to_rfc3339(), self.pdf_name),
        }
    }
}
