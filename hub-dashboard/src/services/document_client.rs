//! REST client for the document backend.
//!
//! Every call carries the caller's bearer credential and an `x-request-id`
//! header. Status codes are folded into [`FetchError`] so callers never see
//! raw transport types.

use crate::config::BackendSettings;
use crate::error::FetchError;
use crate::models::{Document, DocumentDraft, PagedResult};
use crate::services::{Credential, DataSource};
use anyhow::Result;
use async_trait::async_trait;
use hub_core::observability::RequestIdClientExt;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DOCS_PATH: [&str; 3] = ["api", "v1", "docs"];

/// HTTP implementation of [`DataSource`] plus the single-document endpoints.
pub struct DocumentClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl DocumentClient {
    pub fn new(settings: &BackendSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.url).map_err(|e| {
            tracing::error!(url = %settings.url, error = %e, "Invalid backend URL");
            anyhow::anyhow!("Invalid backend URL {}: {}", settings.url, e)
        })?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Backend URL {} cannot carry a path", settings.url);
        }

        let timeout = settings.request_timeout();
        let client = Client::builder().timeout(timeout).build()?;

        tracing::info!(url = %base_url, timeout_ms = timeout.as_millis() as u64, "Document client ready");

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Load one document by id.
    pub async fn get_document(&self, credential: &Credential, id: &str) -> Result<Document, FetchError> {
        ensure_credential(credential)?;
        let url = self.endpoint(&[id]);

        let response = self
            .client
            .tagged_get(url.clone())
            .bearer_auth(credential.expose())
            .send()
            .await
            .map_err(|e| self.send_error(&url, e))?;

        let envelope: DataEnvelope<Document> = self.read_json(response).await?;
        Ok(envelope.data)
    }

    pub async fn create_document(
        &self,
        credential: &Credential,
        draft: &DocumentDraft,
    ) -> Result<Document, FetchError> {
        ensure_credential(credential)?;
        let url = self.endpoint(&[]);

        let response = self
            .client
            .tagged_post(url.clone())
            .bearer_auth(credential.expose())
            .json(&CreateBody {
                title: &draft.title,
                content: &draft.content,
            })
            .send()
            .await
            .map_err(|e| self.send_error(&url, e))?;

        let envelope: DataEnvelope<Document> = self.read_json(response).await?;
        tracing::info!(document_id = %envelope.data.id, "Document created");
        Ok(envelope.data)
    }

    pub async fn update_document(
        &self,
        credential: &Credential,
        id: &str,
        draft: &DocumentDraft,
    ) -> Result<Document, FetchError> {
        ensure_credential(credential)?;
        let url = self.endpoint(&[id]);

        let response = self
            .client
            .tagged_put(url.clone())
            .bearer_auth(credential.expose())
            .json(&UpdateBody {
                title: &draft.title,
                context: &draft.content,
            })
            .send()
            .await
            .map_err(|e| self.send_error(&url, e))?;

        let envelope: DataEnvelope<Document> = self.read_json(response).await?;
        tracing::info!(document_id = %id, "Document updated");
        Ok(envelope.data)
    }

    async fn get_paged(
        &self,
        credential: &Credential,
        url: Url,
        page: u32,
        limit: u32,
    ) -> Result<PagedResult, FetchError> {
        ensure_credential(credential)?;

        let request = self
            .client
            .tagged_get(url.clone())
            .bearer_auth(credential.expose())
            .query(&[("page", page), ("limit", limit)]);
        let request_id = request.request_id().to_string();

        let response = request.send().await.map_err(|e| self.send_error(&url, e))?;
        let result: PagedResult = self.read_json(response).await?;

        tracing::debug!(
            request_id = %request_id,
            path = %url.path(),
            page,
            limit,
            returned = result.data.len(),
            total = ?result.total,
            "Fetched document page"
        );
        Ok(result)
    }

    /// `{base}/api/v1/docs/<segments...>`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(DOCS_PATH).extend(segments);
        }
        url
    }

    fn send_error(&self, url: &Url, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            tracing::error!(url = %url, "Request to document backend timed out");
            return FetchError::Timeout {
                after: self.timeout,
            };
        }
        tracing::error!(url = %url, error = %e, "Failed to reach document backend");
        FetchError::transport(e.status().map(|s| s.as_u16()), None)
    }

    async fn read_json<T: DeserializeOwned>(&self, response: Response) -> Result<T, FetchError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(status = status.as_u16(), "Backend rejected credential");
            return Err(FetchError::AuthenticationRequired);
        }

        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message);
            tracing::error!(status = status.as_u16(), message = ?message, "Backend returned an error");
            return Err(FetchError::transport(Some(status.as_u16()), message));
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    after: self.timeout,
                }
            } else {
                tracing::error!(error = %e, "Failed to decode backend response");
                FetchError::Decode(e.to_string())
            }
        })
    }
}

#[async_trait]
impl DataSource for DocumentClient {
    async fn fetch_page(
        &self,
        credential: &Credential,
        page: u32,
        limit: u32,
    ) -> Result<PagedResult, FetchError> {
        let url = self.endpoint(&[]);
        self.get_paged(credential, url, page, limit).await
    }

    async fn fetch_by_tags(
        &self,
        credential: &Credential,
        tags: &str,
        page: u32,
        limit: u32,
    ) -> Result<PagedResult, FetchError> {
        let url = self.endpoint(&["tag", tags]);
        self.get_paged(credential, url, page, limit).await
    }
}

fn ensure_credential(credential: &Credential) -> Result<(), FetchError> {
    if credential.is_blank() {
        return Err(FetchError::AuthenticationRequired);
    }
    Ok(())
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Serialize)]
struct CreateBody<'a> {
    title: &'a str,
    content: &'a str,
}

/// The update endpoint names the body field `context`.
#[derive(Serialize)]
struct UpdateBody<'a> {
    title: &'a str,
    context: &'a str,
}
