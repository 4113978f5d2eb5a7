//! MusicBrainz API client
//!
//! Artist search against the MusicBrainz Web Service (WS/2).
//!
//! # API Reference
//! - Search: `GET {base}/artist?query=<lucene>&fmt=json&limit=<n>`
//! - Documentation: https://musicbrainz.org/doc/MusicBrainz_API

use crate::models::ExternalArtistRecord;
use amr_common::config::DEFAULT_MUSICBRAINZ_URL;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Version reported in the User-Agent header
const CLIENT_VERSION: &str = "0.1";

/// Default timeout for MusicBrainz API requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// MusicBrainz client errors
#[derive(Debug, Error)]
pub enum MBError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Artist not found: {0}")]
    ArtistNotFound(String),

    /// HTTP 503: MusicBrainz throttled the request
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Account credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Client setup parameters
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Web service root (no trailing slash)
    pub base_url: String,
    /// Application name for the User-Agent header
    pub app_name: String,
    pub credentials: Option<Credentials>,
    pub timeout: Duration,
}

impl ClientSettings {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_MUSICBRAINZ_URL.to_string(),
            app_name: app_name.into(),
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// User-Agent value: `<app>/<version>`
    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.app_name, CLIENT_VERSION)
    }
}

/// Search-by-criteria collaborator
///
/// Implemented by [`MusicBrainzClient`]; tests supply in-memory versions.
#[async_trait]
pub trait ArtistSearch: Send + Sync {
    /// Run a Lucene artist query and return up to `limit` candidates, best first
    async fn search_artists(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<ExternalArtistRecord>, MBError>;
}

/// Search response envelope
#[derive(Debug, Deserialize)]
struct ArtistSearchResponse {
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    artists: Vec<ExternalArtistRecord>,
}

/// MusicBrainz API client
pub struct MusicBrainzClient {
    http_client: reqwest::Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl MusicBrainzClient {
    /// Configure identification and authentication
    pub fn setup(settings: ClientSettings) -> Result<Self, MBError> {
        let http_client = reqwest::Client::builder()
            .user_agent(settings.user_agent())
            .timeout(settings.timeout)
            .build()
            .map_err(|e| MBError::NetworkError(e.to_string()))?;

        tracing::debug!(
            base_url = %settings.base_url,
            user_agent = %settings.user_agent(),
            authenticated = settings.credentials.is_some(),
            "MusicBrainz client configured"
        );

        Ok(Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            credentials: settings.credentials,
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.http_client.get(url);
        match &self.credentials {
            Some(creds) => request.basic_auth(&creds.username, Some(&creds.password)),
            None => request,
        }
    }

    /// Prepare an artist search request
    fn search_request(&self, query: &str, limit: u32) -> reqwest::Result<reqwest::Request> {
        let limit = limit.to_string();
        self.get(&format!("{}/artist", self.base_url))
            .query(&[("query", query), ("fmt", "json"), ("limit", limit.as_str())])
            .build()
    }

    /// Execute a request and decode the JSON body
    async fn fetch<T: DeserializeOwned>(
        &self,
        request: reqwest::Request,
        subject: &str,
    ) -> Result<T, MBError> {
        tracing::debug!(url = %request.url(), "Querying MusicBrainz API");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| MBError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 404 {
            return Err(MBError::ArtistNotFound(subject.to_string()));
        }

        if status == 503 {
            return Err(MBError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MBError::ApiError(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| MBError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl ArtistSearch for MusicBrainzClient {
    async fn search_artists(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<ExternalArtistRecord>, MBError> {
        let request = self
            .search_request(query, limit)
            .map_err(|e| MBError::NetworkError(e.to_string()))?;

        let response: ArtistSearchResponse = self.fetch(request, query).await?;

        tracing::info!(
            query = %query,
            total = ?response.count,
            returned = response.artists.len(),
            "MusicBrainz artist search complete"
        );

        Ok(response.artists)
    }
}
