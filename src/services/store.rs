//! Storage capability boundary.
//!
//! The browser consumes exactly three object-store operations: a
//! delimiter-scoped child listing, a metadata head, and a presigned GET.
//! `ObjectStore` captures that surface; `S3Store` implements it against an
//! S3-compatible endpoint with static credentials.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use s3::Bucket;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::object::ObjectEntry;

/// Immediate children of a prefix, as reported by one listing call.
#[derive(Debug, Clone, Default)]
pub struct ChildListing {
    /// Leaf entries directly beneath the prefix.
    pub objects: Vec<ObjectEntry>,

    /// Aggregated sub-prefix markers, one per "folder" one level down.
    pub common_prefixes: Vec<String>,

    /// True when the store held more keys than the call considered.
    pub is_truncated: bool,
}

/// Metadata returned by a head call, without the body.
#[derive(Debug, Clone, Default)]
pub struct ObjectHead {
    pub content_type: Option<String>,
    pub content_length: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub etag: Option<String>,
}

/// Response-override query parameters embedded in a signed URL. The store
/// applies them to the response headers at fetch time, regardless of how
/// the object was originally stored.
#[derive(Debug, Clone)]
pub struct ResponseOverrides {
    pub content_type: String,
    pub content_disposition: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object `{key}` not found")]
    NotFound { key: String },

    #[error("access to the store was denied: {0}")]
    AccessDenied(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The three operations the browser needs from an object store.
///
/// Every call is an independent, stateless round trip; implementations hold
/// no per-request state.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List the immediate children of `prefix`, grouping deeper descendants
    /// under common prefixes via `delimiter`. At most `max_keys` keys are
    /// considered in this single call; `is_truncated` reports whether more
    /// exist beyond that window.
    async fn list_children(
        &self,
        prefix: &str,
        delimiter: &str,
        max_keys: usize,
    ) -> StoreResult<ChildListing>;

    /// Fetch metadata for `key`. A missing object is `StoreError::NotFound`,
    /// distinct from transport or auth failures.
    async fn head_object(&self, key: &str) -> StoreResult<ObjectHead>;

    /// Produce a signed GET URL for `key`, valid for `ttl_secs`, with the
    /// given response overrides baked into the signature.
    async fn presign_get(
        &self,
        key: &str,
        overrides: &ResponseOverrides,
        ttl_secs: u32,
    ) -> StoreResult<String>;
}

/// Production store backed by an S3-compatible endpoint.
pub struct S3Store {
    bucket: Bucket,
}

impl S3Store {
    /// Build the client from validated configuration.
    ///
    /// Custom endpoints (MinIO and friends) usually require path-style
    /// addressing; the flag is on by default and can be disabled for
    /// virtual-hosted buckets.
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let region = Region::Custom {
            region: cfg.region.clone(),
            endpoint: cfg.endpoint.clone(),
        };
        let credentials = Credentials::new(
            Some(&cfg.access_key),
            Some(&cfg.secret_key),
            None,
            None,
            None,
        )?;

        let mut bucket = Bucket::new(&cfg.bucket, region, credentials)?;
        if cfg.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self { bucket })
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_children(
        &self,
        prefix: &str,
        delimiter: &str,
        max_keys: usize,
    ) -> StoreResult<ChildListing> {
        let (page, status) = self
            .bucket
            .list_page(
                prefix.to_string(),
                Some(delimiter.to_string()),
                None,
                None,
                Some(max_keys),
            )
            .await
            .map_err(|err| classify_s3_error(err, prefix))?;
        ensure_success(status, prefix)?;

        let objects = page.contents.iter().map(entry_from_contents).collect();
        let common_prefixes = page
            .common_prefixes
            .unwrap_or_default()
            .into_iter()
            .map(|cp| cp.prefix)
            .collect();

        Ok(ChildListing {
            objects,
            common_prefixes,
            is_truncated: page.is_truncated,
        })
    }

    async fn head_object(&self, key: &str) -> StoreResult<ObjectHead> {
        let (head, status) = self
            .bucket
            .head_object(key)
            .await
            .map_err(|err| classify_s3_error(err, key))?;
        ensure_success(status, key)?;

        Ok(ObjectHead {
            content_type: head.content_type,
            content_length: head.content_length.unwrap_or(0).max(0) as u64,
            last_modified: head.last_modified.as_deref().and_then(parse_http_date),
            etag: head.e_tag,
        })
    }

    async fn presign_get(
        &self,
        key: &str,
        overrides: &ResponseOverrides,
        ttl_secs: u32,
    ) -> StoreResult<String> {
        let mut queries = HashMap::new();
        queries.insert(
            "response-content-type".to_string(),
            overrides.content_type.clone(),
        );
        queries.insert(
            "response-content-disposition".to_string(),
            overrides.content_disposition.clone(),
        );

        self.bucket
            .presign_get(key, ttl_secs, Some(queries))
            .await
            .map_err(|err| classify_s3_error(err, key))
    }
}

/// Map a raw client error onto the store taxonomy: 404 is a missing object,
/// 401/403 a credentials problem, everything else a backend failure.
fn classify_s3_error(err: S3Error, key: &str) -> StoreError {
    match err {
        S3Error::HttpFailWithBody(404, _) => StoreError::NotFound {
            key: key.to_string(),
        },
        S3Error::HttpFailWithBody(401 | 403, body) => StoreError::AccessDenied(body),
        other => StoreError::Backend(anyhow::Error::new(other)),
    }
}

/// Some providers report failure through the returned status code instead of
/// an error; normalize both paths onto the same taxonomy.
fn ensure_success(status: u16, key: &str) -> StoreResult<()> {
    match status {
        200..=299 => Ok(()),
        404 => Err(StoreError::NotFound {
            key: key.to_string(),
        }),
        401 | 403 => Err(StoreError::AccessDenied(format!("HTTP {status}"))),
        other => Err(StoreError::Backend(anyhow::anyhow!(
            "store returned HTTP {other} for `{key}`"
        ))),
    }
}

fn entry_from_contents(obj: &s3::serde_types::Object) -> ObjectEntry {
    ObjectEntry {
        key: obj.key.clone(),
        size: obj.size,
        last_modified: DateTime::parse_from_rfc3339(&obj.last_modified)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        etag: obj.e_tag.clone(),
    }
}

/// `Last-Modified` arrives as an HTTP date header value.
fn parse_http_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
