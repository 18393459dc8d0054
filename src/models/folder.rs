//! Represents a sub-folder one level beneath the browsed prefix.

use serde::Serialize;

/// A "folder" derived from a storage-side common-prefix marker.
///
/// Folders do not exist as stored entities; they are reconstructed from the
/// common prefixes the store reports for a delimiter-scoped listing.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FolderEntry {
    /// Last path segment, without a trailing slash.
    pub name: String,

    /// Full path of the folder, always ending in a single trailing slash.
    /// Browsing into the folder means listing under this prefix.
    pub prefix: String,
}
