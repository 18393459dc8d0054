//! Represents an object (file) beneath the browsed prefix.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Immutable snapshot of one object's storage-side state at fetch time.
///
/// An entry describes a stored file, addressed by its key. It carries
/// metadata only, never content bytes — downloads go straight to the store
/// via a signed URL.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectEntry {
    /// Object key (path-like identifier, unique within the bucket).
    pub key: String,

    /// Size in bytes.
    pub size: u64,

    /// Timestamp when the object was last modified, if the store reported
    /// one.
    pub last_modified: Option<DateTime<Utc>>,

    /// Opaque entity tag, if the store reported one.
    pub etag: Option<String>,
}
