//! The assembled response for one listing request.

use serde::Serialize;

use super::folder::FolderEntry;
use super::object::ObjectEntry;
use super::page::PageInfo;

/// Page metadata for the two independently paginated child lists.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListingPagination {
    pub folders: PageInfo,
    pub files: PageInfo,
}

/// One page of folders and one page of files under a prefix.
///
/// `objects` and `folders` each hold at most `itemsPerPage` entries.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingResult {
    /// The normalized prefix the listing was scoped to; empty at bucket
    /// root.
    pub prefix: String,

    pub objects: Vec<ObjectEntry>,
    pub folders: Vec<FolderEntry>,

    /// True when the store held more keys under the prefix than the
    /// single-call safety cap; pagination covers only the returned window.
    pub is_truncated: bool,

    pub pagination: ListingPagination,
}
