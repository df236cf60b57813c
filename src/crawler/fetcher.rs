//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building the HTTP client with a browser identity and timeout
//! - GET requests for listing and detail pages
//! - Classifying transport failures
//!
//! A fetch never fails past this boundary: callers always receive a
//! [`PageFetchResult`]. Retries are the orchestrator's business.

use crate::config::FetchConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::fmt;

/// Outcome of one GET: the page markup or a transport failure
pub type PageFetchResult = Result<String, FetchError>;

/// Classification of a transport failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request did not complete within the timeout
    Timeout,
    /// Connection refused, DNS failure, TLS failure
    Connect,
    /// The server answered with a non-2xx status
    HttpStatus(u16),
    /// The response body could not be read
    Body,
    /// The URL could not be parsed
    InvalidUrl,
    /// Any other client error
    Other,
}

impl FetchErrorKind {
    /// Whether trying the same request again may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Connect => true,
            Self::HttpStatus(code) => *code == 429 || (500..600).contains(code),
            Self::Body | Self::InvalidUrl | Self::Other => false,
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Connect => write!(f, "connect"),
            Self::HttpStatus(code) => write!(f, "http {}", code),
            Self::Body => write!(f, "body"),
            Self::InvalidUrl => write!(f, "invalid url"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A transport failure with its detail message
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Anything that can turn a URL into page markup
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> PageFetchResult;
}

/// Builds an HTTP client with the configured identity and timeout
///
/// # Example
///
/// ```no_run
/// use pantry_harvest::config::FetchConfig;
/// use pantry_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// The reqwest-backed fetcher used for real runs
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> PageFetchResult {
        fetch_url(&self.client, url).await
    }
}

/// Fetches a URL and classifies any failure
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Ok(body)` |
/// | Non-2xx | `HttpStatus(code)` |
/// | Timeout | `Timeout` |
/// | Connection refused / DNS / TLS | `Connect` |
/// | Body read failure | `Body` |
pub async fn fetch_url(client: &Client, url: &str) -> PageFetchResult {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| FetchError::new(FetchErrorKind::InvalidUrl, e.to_string()))?;

    let response = client.get(parsed).send().await.map_err(classify_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::new(
            FetchErrorKind::HttpStatus(status.as_u16()),
            status_message(status),
        ));
    }

    response.text().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::new(FetchErrorKind::Timeout, e.to_string())
        } else {
            FetchError::new(FetchErrorKind::Body, e.to_string())
        }
    })
}

fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::new(FetchErrorKind::Timeout, "Request timeout")
    } else if e.is_connect() {
        FetchError::new(FetchErrorKind::Connect, e.to_string())
    } else {
        FetchError::new(FetchErrorKind::Other, e.to_string())
    }
}

fn status_message(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
