//! Represents a short-lived grant for fetching one object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Requested browser handling of the fetched object.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// Render in place.
    #[default]
    Inline,
    /// Force a save dialog.
    Attachment,
}

impl Disposition {
    /// Render the `Content-Disposition` value embedded in the signed URL.
    ///
    /// Attachments name the file after the object's last path segment so a
    /// forced download saves under the object's own name.
    pub fn header_value(self, filename: &str) -> String {
        match self {
            Disposition::Inline => "inline".to_string(),
            Disposition::Attachment => format!("attachment; filename=\"{filename}\""),
        }
    }
}

/// Metadata plus a time-limited signed URL for one object.
///
/// Created fresh per request and never persisted; the URL expires at the
/// storage layer once its TTL runs out.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    pub key: String,

    /// Direct, credential-embedded URL to the object body.
    pub signed_url: String,

    pub content_type: String,
    pub content_length: u64,
    pub last_modified: Option<DateTime<Utc>>,
}
