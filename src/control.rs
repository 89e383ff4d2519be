//! Cache control endpoint.
//!
//! An operator (or a publishing hook) calls [`invalidate_cache`] after
//! editing content so the next request sees the change without waiting for
//! the freshness window to lapse. The response shape is what the endpoint
//! serializes back to the caller.

use crate::collection::Collection;
use crate::error::Result;
use crate::store::{Clock, DocumentStore};
use serde::Serialize;

/// Message returned when the cache was dropped.
pub const INVALIDATED_MESSAGE: &str = "Cache invalidated successfully";

/// Message returned when dropping the cache failed.
pub const INVALIDATE_FAILED_MESSAGE: &str = "Error invalidating cache";

/// Something whose cache can be dropped on request.
pub trait CacheControl: Send + Sync {
    /// Drops cached state so the next access reloads.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache could not be dropped.
    fn clear_cache(&self) -> Result<()>;
}

impl<C: Collection, K: Clock> CacheControl for DocumentStore<C, K> {
    fn clear_cache(&self) -> Result<()> {
        self.invalidate();
        Ok(())
    }
}

/// Outcome of an invalidation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidateResponse {
    /// Whether the cache was dropped.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
}

impl InvalidateResponse {
    fn ok() -> Self {
        Self {
            success: true,
            message: INVALIDATED_MESSAGE.to_string(),
        }
    }

    fn failed() -> Self {
        Self {
            success: false,
            message: INVALIDATE_FAILED_MESSAGE.to_string(),
        }
    }
}

/// Handles an invalidation request. Takes no input.
///
/// # Examples
///
/// ```
/// use casebook::collection::MemoryCollection;
/// use casebook::control::invalidate_cache;
/// use casebook::store::DocumentStore;
///
/// let store = DocumentStore::new(MemoryCollection::new());
/// let response = invalidate_cache(&store);
/// assert!(response.success);
/// assert_eq!(response.message, "Cache invalidated successfully");
/// ```
pub fn invalidate_cache(target: &dyn CacheControl) -> InvalidateResponse {
    match target.clear_cache() {
        Ok(()) => {
            tracing::info!("cache invalidated on request");
            InvalidateResponse::ok()
        }
        Err(e) => {
            tracing::error!(error = %e, "cache invalidation failed");
            InvalidateResponse::failed()
        }
    }
}
