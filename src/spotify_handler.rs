use crate::config::{Credentials, Settings};
use crate::error::{ApiErrorResponse, AuthErrorResponse, BsidesError, Result};

use log::{debug, warn};
use rspotify::http::HttpError;
use rspotify::model::{FullTrack, Page, SearchResult, SearchType, TrackId};
use rspotify::prelude::*;
use rspotify::{ClientCredsSpotify, ClientError, Config};
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Largest page size the search endpoint accepts.
const SEARCH_MAX_LIMIT: u32 = 50;

/// Authenticated handle to the Spotify Web API.
///
/// Wraps a client-credentials `rspotify` client. The first token is requested
/// on first use; after that `rspotify` re-requests it whenever it expires.
#[derive(Clone)]
pub struct SpotifyHandler {
    spotify: ClientCredsSpotify,
    client_id: String,
    authenticated: Arc<OnceCell<()>>,
}

// the inner client would print the secret and the bearer token
impl fmt::Debug for SpotifyHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyHandler")
            .field("client_id", &self.client_id)
            .field("authenticated", &self.authenticated.initialized())
            .finish()
    }
}

impl SpotifyHandler {
    /// Creates a new `SpotifyHandler` from the environment.
    ///
    /// No request is sent yet: the access token is fetched on first use.
    ///
    /// # Errors
    /// Returns `BsidesError::MissingEnvVar` if the client id or secret is not set.
    ///
    /// # Returns
    /// * `Result<Self>` - The created `SpotifyHandler` instance.
    pub fn new() -> Result<Self> {
        Ok(Self::with_settings(Credentials::from_env()?, &Settings::default()))
    }

    /// Creates a handler with explicit credentials and endpoints.
    #[must_use]
    pub fn with_settings(credentials: Credentials, settings: &Settings) -> Self {
        let config = Config {
            api_base_url: settings.api_base_url.clone(),
            auth_base_url: settings.auth_base_url.clone(),
            token_cached: false,
            token_refreshing: true,
            ..Config::default()
        };
        let creds = rspotify::Credentials::new(&credentials.client_id, &credentials.client_secret);

        SpotifyHandler {
            spotify: ClientCredsSpotify::with_config(creds, config),
            client_id: credentials.client_id,
            authenticated: Arc::new(OnceCell::new()),
        }
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Requests an access token now instead of waiting for the first API call.
    ///
    /// # Errors
    /// * `BsidesError::Auth` - If the credentials are rejected.
    pub async fn authenticate(&self) -> Result<()> {
        self.request_token().await?;
        // a concurrent first call may have set it already
        let _ = self.authenticated.set(());
        Ok(())
    }

    /// Get a single catalog track.
    ///
    /// # Arguments
    /// * `id` - The base62 Spotify track id.
    ///
    /// # Errors
    /// * `BsidesError::InvalidId` - If `id` is not a base62 id; nothing is sent.
    /// * `BsidesError::Api` - If the API answers with a non-success status.
    pub async fn track(&self, id: &str) -> Result<FullTrack> {
        let track_id = Some(id)
            .filter(|id| !id.is_empty())
            .and_then(|id| TrackId::from_id(id).ok())
            .ok_or_else(|| BsidesError::InvalidId(id.to_string()))?;

        self.ensure_token().await?;
        debug!("Fetching track {id}");

        match self.spotify.track(track_id, None).await {
            Ok(track) => Ok(track),
            Err(e) => Err(map_client_error(e, api_error).await),
        }
    }

    /// Search the catalog for tracks.
    ///
    /// # Arguments
    /// * `query` - Search query, may use field filters such as `artist:`.
    /// * `limit` - Number of results, clamped to 1..=50.
    ///
    /// # Errors
    /// Returns an error if the API request fails.
    pub async fn search_tracks(&self, query: &str, limit: u32) -> Result<Page<FullTrack>> {
        self.ensure_token().await?;
        debug!("Searching tracks for {query:?}");

        let result = self
            .spotify
            .search(
                query,
                SearchType::Track,
                None,
                None,
                Some(limit.clamp(1, SEARCH_MAX_LIMIT)),
                None,
            )
            .await;

        match result {
            Ok(SearchResult::Tracks(page)) => Ok(page),
            Ok(other) => Err(BsidesError::Other(format!(
                "expected a track page, got {other:?}"
            ))),
            Err(e) => Err(map_client_error(e, api_error).await),
        }
    }

    async fn ensure_token(&self) -> Result<()> {
        self.authenticated
            .get_or_try_init(|| self.request_token())
            .await?;
        Ok(())
    }

    async fn request_token(&self) -> Result<()> {
        debug!("Requesting access token for client {}", self.client_id);

        match self.spotify.request_token().await {
            Ok(()) => Ok(()),
            Err(e) => {
                let err = map_client_error(e, auth_error).await;
                warn!("Token request failed: {err}");
                Err(err)
            }
        }
    }
}

fn auth_error(status: u16, body: &str) -> BsidesError {
    BsidesError::Auth(AuthErrorResponse::from_status(status, body))
}

fn api_error(status: u16, body: &str) -> BsidesError {
    BsidesError::Api(ApiErrorResponse::from_status(status, body))
}

/// Turns a non-success response into `on_status(status, body)`; every other
/// client error is kept as `BsidesError::Spotify`.
async fn map_client_error(
    err: ClientError,
    on_status: fn(u16, &str) -> BsidesError,
) -> BsidesError {
    match err {
        ClientError::Http(http) => match *http {
            HttpError::StatusCode(response) => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                on_status(status, &body)
            }
            other => BsidesError::Spotify(ClientError::Http(Box::new(other))),
        },
        other => BsidesError::Spotify(other),
    }
}
