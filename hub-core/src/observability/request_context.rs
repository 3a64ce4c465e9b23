//! Request correlation for outbound HTTP calls.
//!
//! Every request sent through [`RequestIdClientExt`] carries an `x-request-id`
//! header so backend logs can be joined with the client's own events.

use tracing::Instrument;

/// Header name for request correlation ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Generate a fresh correlation ID.
pub fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A request builder that stamps a correlation ID on send.
pub struct TaggedRequest {
    request: reqwest::RequestBuilder,
    request_id: String,
}

impl TaggedRequest {
    pub fn new(request: reqwest::RequestBuilder) -> Self {
        Self {
            request,
            request_id: new_request_id(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn json<T: serde::Serialize + ?Sized>(self, json: &T) -> Self {
        Self {
            request: self.request.json(json),
            ..self
        }
    }

    pub fn query<T: serde::Serialize + ?Sized>(self, query: &T) -> Self {
        Self {
            request: self.request.query(query),
            ..self
        }
    }

    pub fn bearer_auth<T: std::fmt::Display>(self, token: T) -> Self {
        Self {
            request: self.request.bearer_auth(token),
            ..self
        }
    }

    /// Send the request with the correlation header attached, inside an
    /// `http_request` span carrying the same id.
    pub async fn send(self) -> Result<reqwest::Response, reqwest::Error> {
        let span = tracing::debug_span!("http_request", request_id = %self.request_id);
        async move {
            tracing::trace!("Sending request");
            self.request
                .header(REQUEST_ID_HEADER, self.request_id)
                .send()
                .await
        }
        .instrument(span)
        .await
    }
}

/// Extension trait for reqwest::Client to create correlated requests.
pub trait RequestIdClientExt {
    fn tagged_get(&self, url: reqwest::Url) -> TaggedRequest;
    fn tagged_post(&self, url: reqwest::Url) -> TaggedRequest;
    fn tagged_put(&self, url: reqwest::Url) -> TaggedRequest;
}

impl RequestIdClientExt for reqwest::Client {
    fn tagged_get(&self, url: reqwest::Url) -> TaggedRequest {
        TaggedRequest::new(self.get(url))
    }

    fn tagged_post(&self, url: reqwest::Url) -> TaggedRequest {
        TaggedRequest::new(self.post(url))
    }

    fn tagged_put(&self, url: reqwest::Url) -> TaggedRequest {
        TaggedRequest::new(self.put(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(new_request_id(), new_request_id());
    }

    #[test]
    fn tagged_requests_get_distinct_ids() {
        let client = reqwest::Client::new();
        let url = reqwest::Url::parse("http://localhost:1/").unwrap();
        let first = client.tagged_get(url.clone());
        let second = client.tagged_put(url);
        assert!(!first.request_id().is_empty());
        assert_ne!(first.request_id(), second.request_id());
    }
}
