//! # Folio HTTP Client
//!
//! Page Fetcher over the wire contract:
//!
//! ```text
//! GET {base}/records?index=<u64>&size=<u32>   ->   PageEnvelope (JSON)
//! ```
//!
//! One call, one request. No retries.

use crate::config::ClientConfig;
use crate::fetcher::PageFetcher;
use folio_core::{FetchError, FolioError, PageEnvelope, PageRequest, SessionContext, decode_page};
use std::time::Duration;

/// HTTP client that fetches pages from a Folio-compatible server.
#[derive(Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
}

impl HttpFetcher {
    /// Create a fetcher with reqwest's default client settings.
    pub fn new(base_url: impl Into<String>, session: SessionContext) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, session)
    }

    /// Create a fetcher whose requests time out after `timeout`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        session: SessionContext,
        timeout: Duration,
    ) -> Result<Self, FolioError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FolioError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self::with_client(http, base_url, session))
    }

    /// Create a fetcher from loaded configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, FolioError> {
        Self::with_timeout(config.url.clone(), config.session(), config.timeout())
    }

    fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        session: SessionContext,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch page `index` holding at most `size` records.
    ///
    /// Arguments are validated before any request is built, so an invalid
    /// call never touches the network.
    pub async fn fetch_page(&self, index: u64, size: u32) -> Result<PageEnvelope, FetchError> {
        let request = PageRequest::new(index, size)?;
        self.fetch_request(request).await
    }

    /// Build a GET request with optional Bearer auth.
    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.get(&url);
        if let Some(token) = self.session.token() {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn fetch_request(&self, request: PageRequest) -> Result<PageEnvelope, FetchError> {
        let resp = self
            .get("/records")
            .query(&[("index", request.index), ("size", u64::from(request.size))])
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("{}: {e}", self.base_url)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Remote(status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Network(format!("reading body: {e}")))?;
        let envelope = decode_page(&body)?;
        envelope.check_against(&request)?;
        Ok(envelope)
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, request: PageRequest) -> Result<PageEnvelope, FetchError> {
        self.fetch_request(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let fetcher = HttpFetcher::new("http://localhost:8080/", SessionContext::anonymous());
        assert_eq!(fetcher.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn invalid_arguments_fail_before_network() {
        // Port 9 (discard) is never contacted: validation fails first.
        let fetcher = HttpFetcher::new("http://127.0.0.1:9", SessionContext::anonymous());
        let result = fetcher.fetch_page(0, 0).await;
        assert!(matches!(result, Err(FetchError::InvalidArgument(_))));
    }
}
