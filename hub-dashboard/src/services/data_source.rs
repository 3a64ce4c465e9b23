//! The query contract the dashboard controller consumes.

use crate::error::FetchError;
use crate::models::PagedResult;
use crate::services::Credential;
use async_trait::async_trait;
use std::sync::Arc;

/// Paged document queries against the backend.
///
/// Both operations fail with [`FetchError::AuthenticationRequired`] when the
/// credential is rejected.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Unfiltered page of documents. The server owns `total` and `total_pages`.
    async fn fetch_page(
        &self,
        credential: &Credential,
        page: u32,
        limit: u32,
    ) -> Result<PagedResult, FetchError>;

    /// Page of documents carrying the given tags. `tags` is comma-joined.
    async fn fetch_by_tags(
        &self,
        credential: &Credential,
        tags: &str,
        page: u32,
        limit: u32,
    ) -> Result<PagedResult, FetchError>;
}

#[async_trait]
impl<T: DataSource + ?Sized> DataSource for Arc<T> {
    async fn fetch_page(
        &self,
        credential: &Credential,
        page: u32,
        limit: u32,
    ) -> Result<PagedResult, FetchError> {
        (**self).fetch_page(credential, page, limit).await
    }

    async fn fetch_by_tags(
        &self,
        credential: &Credential,
        tags: &str,
        page: u32,
        limit: u32,
    ) -> Result<PagedResult, FetchError> {
        (**self).fetch_by_tags(credential, tags, page, limit).await
    }
}
