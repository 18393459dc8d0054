//! Service layer: the listing engine, the access broker, the selection
//! session, and the storage capability they all sit on.

pub mod access;
pub mod listing;
pub mod selection;
pub mod store;

use std::sync::Arc;

use thiserror::Error;

use store::{ObjectStore, StoreError};

/// Errors produced by the listing service and the access broker.
#[derive(Debug, Error)]
pub enum BrowseError {
    /// A request parameter violated a constraint. Raised before any storage
    /// call is made; the message names the violated constraint.
    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type BrowseResult<T> = Result<T, BrowseError>;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub listing: listing::ListingService,
    pub access: access::AccessBroker,

    /// Direct store handle, used by the readiness probe.
    pub store: Arc<dyn ObjectStore>,
}

impl AppState {
    /// Wire both services onto one shared store handle.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            listing: listing::ListingService::new(Arc::clone(&store)),
            access: access::AccessBroker::new(Arc::clone(&store)),
            store,
        }
    }
}
