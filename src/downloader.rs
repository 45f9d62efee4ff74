//! One-shot HTTP fetches with optional timeout cancellation.
//!
//! The downloader performs exactly one request and buffers the whole
//! response. It never retries and it does not judge status codes; both are
//! the caller's policy. Timeout expiry drops the in-flight request future,
//! which aborts the connection, so the timer cannot outlive the call.

use crate::error::DownloadError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, StatusCode};
use std::time::Duration;
use tracing::debug;

/// User agent sent when neither the headers map nor the request override one.
pub const DEFAULT_USER_AGENT: &str = concat!("shunbun/", env!("CARGO_PKG_VERSION"));

/// Specification of a single HTTP request.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub method: Method,
    /// Overrides any user agent from `headers`.
    pub user_agent: Option<String>,
    /// Extra headers, applied over the defaults in order.
    pub headers: Vec<(String, String)>,
    /// Overall deadline for the request. None or zero disables it.
    pub wait_timeout: Option<Duration>,
    pub body: Option<Vec<u8>>,
}

impl DownloadRequest {
    /// A plain GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            user_agent: None,
            headers: Vec::new(),
            wait_timeout: None,
            body: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A completed request: final URL, status, headers, and the buffered body.
#[derive(Debug)]
pub struct Downloaded {
    pub url: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Downloaded {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The `content-type` header, when present and valid UTF-8.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }
}

/// Performs one-shot HTTP fetches.
pub struct Downloader {
    client: reqwest::Client,
}

impl Downloader {
    pub fn new() -> Result<Self, DownloadError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }

    /// Run one request to completion, failure, or timeout.
    pub async fn run(&self, request: &DownloadRequest) -> Result<Downloaded, DownloadError> {
        let headers = build_headers(request)?;

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        debug!(url = %request.url, method = %request.method, "starting download");

        match request.wait_timeout {
            Some(after) if !after.is_zero() => {
                match tokio::time::timeout(after, execute(builder)).await {
                    Ok(result) => result,
                    Err(_) => Err(DownloadError::Timeout { after }),
                }
            }
            _ => execute(builder).await,
        }
    }
}

async fn execute(builder: reqwest::RequestBuilder) -> Result<Downloaded, DownloadError> {
    let response = builder.send().await?;
    let status = response.status();
    let url = response.url().to_string();
    let headers = response.headers().clone();
    let body = response.bytes().await?.to_vec();

    debug!(%url, %status, bytes = body.len(), "download finished");

    Ok(Downloaded {
        url,
        status,
        headers,
        body,
    })
}

/// Layer request headers: default user agent, then the explicit headers map,
/// then the `user_agent` field. Last writer wins.
fn build_headers(request: &DownloadRequest) -> Result<HeaderMap, DownloadError> {
    let mut map = HeaderMap::new();
    map.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

    for (name, value) in &request.headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| DownloadError::InvalidHeader {
                name: name.clone(),
            })?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| DownloadError::InvalidHeader {
                name: name.clone(),
            })?;
        map.insert(header_name, header_value);
    }

    if let Some(user_agent) = &request.user_agent {
        let value =
            HeaderValue::from_str(user_agent).map_err(|_| DownloadError::InvalidHeader {
                name: "user-agent".to_string(),
            })?;
        map.insert(USER_AGENT, value);
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user_agent_applied() {
        let request = DownloadRequest::get("http://example.com/feed");
        let headers = build_headers(&request).unwrap();
        assert_eq!(
            headers.get(USER_AGENT).unwrap().to_str().unwrap(),
            DEFAULT_USER_AGENT
        );
    }

    #[test]
    fn test_headers_map_overrides_default_user_agent() {
        let request = DownloadRequest::get("http://example.com/feed")
            .with_header("User-Agent", "feed-bot/2.0");
        let headers = build_headers(&request).unwrap();
        assert_eq!(headers.get(USER_AGENT).unwrap().to_str().unwrap(), "feed-bot/2.0");
    }

    #[test]
    fn test_user_agent_field_wins_over_headers_map() {
        let request = DownloadRequest::get("http://example.com/feed")
            .with_header("User-Agent", "feed-bot/2.0")
            .with_user_agent("channel-crawler/1.0");
        let headers = build_headers(&request).unwrap();
        assert_eq!(
            headers.get(USER_AGENT).unwrap().to_str().unwrap(),
            "channel-crawler/1.0"
        );
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let request =
            DownloadRequest::get("http://example.com/feed").with_header("bad name", "x");
        assert!(matches!(
            build_headers(&request),
            Err(DownloadError::InvalidHeader { .. })
        ));
    }

    #[tokio::test]
    async fn test_timeout_yields_timeout_error() {
        // A listener that accepts and then goes silent, so the request can
        // only finish by hitting its deadline.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _socket = listener.accept().await;
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let downloader = Downloader::new().unwrap();
        let request = DownloadRequest::get(format!("http://{addr}/feed"))
            .with_timeout(Duration::from_millis(100));
        let err = downloader.run(&request).await.unwrap_err();
        assert!(err.is_timeout(), "expected timeout, got {err:?}");
    }
}
