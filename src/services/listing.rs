//! The listing-and-pagination engine.
//!
//! One delimiter-scoped call against the store fetches the immediate
//! children of a prefix; objects and folders are then sorted and paginated
//! independently. Nothing is cached between requests.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use crate::models::folder::FolderEntry;
use crate::models::listing::{ListingPagination, ListingResult};
use crate::models::object::ObjectEntry;
use crate::models::page::{ITEMS_PER_PAGE_CAP, paginate};
use crate::services::store::ObjectStore;
use crate::services::{BrowseError, BrowseResult};

/// Hierarchy delimiter: one level of "folders" per listing.
const DELIMITER: &str = "/";

/// Keys considered by the store in a single listing call. Entries beyond
/// this window are reported via the truncation flag, not fetched.
const LIST_MAX_KEYS: usize = 1000;

/// Parameters of one listing request. Pages are 1-based.
#[derive(Clone, Debug)]
pub struct ListingParams {
    pub prefix: Option<String>,
    pub folders_page: usize,
    pub files_page: usize,
    pub items_per_page: usize,
}

#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn ObjectStore>,
}

impl ListingService {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Reject malformed paging parameters before any storage call.
    fn ensure_params_valid(params: &ListingParams) -> BrowseResult<()> {
        if params.folders_page == 0 {
            return Err(BrowseError::InvalidRequest(
                "foldersPage must be at least 1".into(),
            ));
        }
        if params.files_page == 0 {
            return Err(BrowseError::InvalidRequest(
                "filesPage must be at least 1".into(),
            ));
        }
        if params.items_per_page == 0 {
            return Err(BrowseError::InvalidRequest(
                "itemsPerPage must be at least 1".into(),
            ));
        }
        if params.items_per_page > ITEMS_PER_PAGE_CAP {
            return Err(BrowseError::InvalidRequest(format!(
                "itemsPerPage must not exceed {ITEMS_PER_PAGE_CAP}"
            )));
        }
        Ok(())
    }

    /// List one page of folders and one page of files under a prefix.
    ///
    /// The two child lists are sorted and paginated independently. Fails
    /// whole: a storage error never yields a partial page.
    pub async fn list(&self, params: ListingParams) -> BrowseResult<ListingResult> {
        Self::ensure_params_valid(&params)?;

        let prefix = normalize_prefix(params.prefix.as_deref());
        let listing = self
            .store
            .list_children(&prefix, DELIMITER, LIST_MAX_KEYS)
            .await?;
        debug!(
            prefix = %prefix,
            objects = listing.objects.len(),
            folders = listing.common_prefixes.len(),
            truncated = listing.is_truncated,
            "fetched children"
        );

        let mut objects = listing.objects;
        sort_objects(&mut objects);

        let mut folders: Vec<FolderEntry> = listing
            .common_prefixes
            .iter()
            .filter_map(|raw| folder_from_common_prefix(&prefix, raw))
            .collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name));

        let (objects_page, files_info) = paginate(objects, params.files_page, params.items_per_page);
        let (folders_page, folders_info) =
            paginate(folders, params.folders_page, params.items_per_page);

        Ok(ListingResult {
            prefix,
            objects: objects_page,
            folders: folders_page,
            is_truncated: listing.is_truncated,
            pagination: ListingPagination {
                folders: folders_info,
                files: files_info,
            },
        })
    }
}

/// Normalize a caller-supplied prefix: no leading slashes, exactly one
/// trailing slash appended when non-empty. Empty means bucket root.
fn normalize_prefix(raw: Option<&str>) -> String {
    let trimmed = raw.unwrap_or("").trim_start_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

/// Sort newest-first. Entries without a timestamp rank after all entries
/// that have one; among themselves they keep fetch order (stable sort), so
/// their relative order follows whatever the store returned.
fn sort_objects(objects: &mut [ObjectEntry]) {
    objects.sort_by(|a, b| match (&a.last_modified, &b.last_modified) {
        (Some(lhs), Some(rhs)) => rhs.cmp(lhs),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Derive a folder entry from a store-reported common prefix.
///
/// Returns `None` for markers that reduce to an empty name or echo the
/// queried prefix itself.
fn folder_from_common_prefix(queried: &str, raw: &str) -> Option<FolderEntry> {
    let stripped = raw.strip_prefix(queried).unwrap_or(raw);
    let name = stripped.trim_end_matches('/');
    if name.is_empty() || name == queried {
        return None;
    }
    Some(FolderEntry {
        name: name.to_string(),
        prefix: format!("{queried}{name}/"),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::services::store::testing::MockStore;
    use crate::services::store::{ChildListing, StoreError};

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn entry(key: &str, modified: Option<DateTime<Utc>>) -> ObjectEntry {
        ObjectEntry {
            key: key.to_string(),
            size: 42,
            last_modified: modified,
            etag: Some("abc".to_string()),
        }
    }

    fn params(prefix: Option<&str>, files_page: usize, items_per_page: usize) -> ListingParams {
        ListingParams {
            prefix: prefix.map(str::to_string),
            folders_page: 1,
            files_page,
            items_per_page,
        }
    }

    fn service(store: &Arc<MockStore>) -> ListingService {
        ListingService::new(Arc::clone(store) as Arc<dyn ObjectStore>)
    }

    #[tokio::test]
    async fn normalizes_prefix_before_listing() {
        let store = Arc::new(MockStore::default());
        let result = service(&store)
            .list(params(Some("//docs/reports"), 1, 10))
            .await
            .unwrap();

        assert_eq!(result.prefix, "docs/reports/");
        let calls = store.list_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prefix, "docs/reports/");
        assert_eq!(calls[0].delimiter, "/");
        assert_eq!(calls[0].max_keys, 1000);
    }

    #[tokio::test]
    async fn sorts_objects_newest_first_and_untimed_last() {
        // prefix docs/: a@2024-01-01, b@2024-03-01, c without a timestamp,
        // two per page -> page 1 = [b, a], page 2 = [c].
        let store = Arc::new(MockStore {
            listing: ChildListing {
                objects: vec![
                    entry("docs/a", Some(day(2024, 1, 1))),
                    entry("docs/c", None),
                    entry("docs/b", Some(day(2024, 3, 1))),
                ],
                ..ChildListing::default()
            },
            ..MockStore::default()
        });
        let svc = service(&store);

        let first = svc.list(params(Some("docs/"), 1, 2)).await.unwrap();
        let keys: Vec<_> = first.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, ["docs/b", "docs/a"]);
        assert_eq!(first.pagination.files.total_items, 3);
        assert_eq!(first.pagination.files.total_pages, 2);
        assert!(first.pagination.files.has_next_page);
        assert!(!first.pagination.files.has_prev_page);

        let second = svc.list(params(Some("docs/"), 2, 2)).await.unwrap();
        let keys: Vec<_> = second.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, ["docs/c"]);
        assert!(!second.pagination.files.has_next_page);
        assert!(second.pagination.files.has_prev_page);
    }

    #[tokio::test]
    async fn untimed_objects_keep_fetch_order() {
        let store = Arc::new(MockStore {
            listing: ChildListing {
                objects: vec![
                    entry("x", None),
                    entry("y", None),
                    entry("z", Some(day(2023, 6, 1))),
                ],
                ..ChildListing::default()
            },
            ..MockStore::default()
        });

        let result = service(&store).list(params(None, 1, 10)).await.unwrap();
        let keys: Vec<_> = result.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, ["z", "x", "y"]);
    }

    #[tokio::test]
    async fn derives_folders_from_common_prefixes() {
        let store = Arc::new(MockStore {
            listing: ChildListing {
                // Out of order, plus markers that must be discarded: the
                // prefix echoing itself and a marker reducing to nothing.
                common_prefixes: vec![
                    "docs/zeta/".to_string(),
                    "docs/alpha/".to_string(),
                    "docs/".to_string(),
                    "docs//".to_string(),
                ],
                ..ChildListing::default()
            },
            ..MockStore::default()
        });

        let result = service(&store)
            .list(params(Some("docs"), 1, 10))
            .await
            .unwrap();

        let names: Vec<_> = result.folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["alpha", "zeta"]);
        for folder in &result.folders {
            assert!(!folder.name.ends_with('/'));
            assert!(folder.prefix.starts_with("docs/"));
            assert!(folder.prefix.ends_with('/'));
            assert!(!folder.prefix.ends_with("//"));
        }
        assert_eq!(result.folders[0].prefix, "docs/alpha/");
        assert_eq!(result.pagination.folders.total_items, 2);
    }

    #[tokio::test]
    async fn folders_at_bucket_root() {
        let store = Arc::new(MockStore {
            listing: ChildListing {
                common_prefixes: vec!["music/".to_string()],
                ..ChildListing::default()
            },
            ..MockStore::default()
        });

        let result = service(&store).list(params(None, 1, 10)).await.unwrap();
        assert_eq!(result.prefix, "");
        assert_eq!(result.folders[0].name, "music");
        assert_eq!(result.folders[0].prefix, "music/");
    }

    #[tokio::test]
    async fn rejects_invalid_params_before_any_store_call() {
        let store = Arc::new(MockStore::default());
        let svc = service(&store);

        let cases = [
            (
                ListingParams {
                    prefix: None,
                    folders_page: 0,
                    files_page: 1,
                    items_per_page: 10,
                },
                "foldersPage",
            ),
            (
                ListingParams {
                    prefix: None,
                    folders_page: 1,
                    files_page: 0,
                    items_per_page: 10,
                },
                "filesPage",
            ),
            (params(None, 1, 0), "itemsPerPage"),
            (params(None, 1, 51), "itemsPerPage"),
        ];

        for (bad, constraint) in cases {
            let err = svc.list(bad).await.unwrap_err();
            assert!(
                matches!(err, BrowseError::InvalidRequest(_)),
                "expected validation error, got {err:?}"
            );
            assert!(err.to_string().contains(constraint));
        }
        assert!(store.list_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn storage_failure_is_not_an_empty_listing() {
        let store = Arc::new(MockStore {
            fail_backend: true,
            ..MockStore::default()
        });

        let err = service(&store).list(params(None, 1, 10)).await.unwrap_err();
        assert!(matches!(
            err,
            BrowseError::Store(StoreError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn empty_prefix_yields_zeroed_pages() {
        let store = Arc::new(MockStore::default());
        let result = service(&store)
            .list(params(Some("empty/"), 1, 10))
            .await
            .unwrap();

        assert!(result.objects.is_empty());
        assert!(result.folders.is_empty());
        assert!(!result.is_truncated);
        for info in [&result.pagination.files, &result.pagination.folders] {
            assert_eq!(info.total_items, 0);
            assert_eq!(info.total_pages, 0);
            assert!(!info.has_next_page);
            assert!(!info.has_prev_page);
        }
    }

    #[tokio::test]
    async fn surfaces_store_truncation() {
        let store = Arc::new(MockStore {
            listing: ChildListing {
                objects: vec![entry("a", None)],
                is_truncated: true,
                ..ChildListing::default()
            },
            ..MockStore::default()
        });

        let result = service(&store).list(params(None, 1, 10)).await.unwrap();
        assert!(result.is_truncated);
    }
}
