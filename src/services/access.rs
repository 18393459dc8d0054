//! The access broker: metadata plus a short-lived signed link for one
//! object.

use std::sync::Arc;

use tracing::debug;

use crate::models::access::{AccessGrant, Disposition};
use crate::services::store::{ObjectStore, ResponseOverrides};
use crate::services::{BrowseError, BrowseResult};

/// Signed URLs stay valid for this long; expiry is enforced by the store,
/// not the application. Not configurable per call.
const SIGNED_URL_TTL_SECS: u32 = 300;

/// Fallback when the store reports no content type.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Clone)]
pub struct AccessBroker {
    store: Arc<dyn ObjectStore>,
}

impl AccessBroker {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Produce a fresh grant for `key`.
    ///
    /// Heads the object first so a missing key fails with a not-found error
    /// before any URL is signed, then embeds the fetched content type and
    /// the requested disposition as response overrides in the signed URL —
    /// the browser's inline/download behavior follows the caller's intent
    /// regardless of how the object was stored.
    pub async fn grant(&self, key: &str, disposition: Disposition) -> BrowseResult<AccessGrant> {
        if key.is_empty() {
            return Err(BrowseError::InvalidRequest(
                "key must be a non-empty string".into(),
            ));
        }

        let head = self.store.head_object(key).await?;
        let content_type = head
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let filename = key.split('/').next_back().unwrap_or(key);
        let overrides = ResponseOverrides {
            content_type: content_type.clone(),
            content_disposition: disposition.header_value(filename),
        };
        let signed_url = self
            .store
            .presign_get(key, &overrides, SIGNED_URL_TTL_SECS)
            .await?;
        debug!(key = %key, ?disposition, "issued access grant");

        Ok(AccessGrant {
            key: key.to_string(),
            signed_url,
            content_type,
            content_length: head.content_length,
            last_modified: head.last_modified,
        })
    }
}
