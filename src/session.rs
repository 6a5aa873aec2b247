use crate::{link::PlaylistId, playlist::PlaylistTracks, types::TokenBundle};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use chrono::{DateTime, Utc};
use tower_sessions::{session::Error, Session};
use tracing::debug;

pub const SESSION_COOKIE_NAME: &str = "spotify_player_session";

const TOKENS_KEY: &str = "tokens";
const PLAYLIST_ID_KEY: &str = "playlist_id";
const TRACKS_KEY: &str = "tracks";
const OAUTH_STATE_KEY: &str = "oauth_state";

type Result<T> = std::result::Result<T, Error>;

/// Per-browser state, backed by a `tower_sessions` session behind a signed cookie.
#[derive(Debug, Clone)]
pub struct UserSession {
    session: Session,
}

#[async_trait]
impl<S> FromRequestParts<S> for UserSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        Ok(Self { session })
    }
}

impl UserSession {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn tokens(&self) -> Result<Option<TokenBundle>> {
        self.session.get(TOKENS_KEY).await
    }

    pub async fn set_tokens(&self, tokens: &TokenBundle) -> Result<()> {
        self.session.insert(TOKENS_KEY, tokens).await
    }

    /// The bearer token, if one is stored and still valid at `now`.
    pub async fn access_token(&self, now: DateTime<Utc>) -> Result<Option<String>> {
        Ok(self.tokens().await?.and_then(|tokens| {
            if tokens.is_expired(now) {
                debug!("Stored access token expired at {}", tokens.expires_at);
                None
            } else {
                Some(tokens.access_token)
            }
        }))
    }

    pub async fn playlist_id(&self) -> Result<Option<PlaylistId>> {
        self.session.get(PLAYLIST_ID_KEY).await
    }

    /// Stores a new playlist and forgets tracks fetched for the previous one.
    pub async fn set_playlist_id(&self, playlist_id: &PlaylistId) -> Result<()> {
        if self.playlist_id().await?.as_ref() != Some(playlist_id) {
            self.session.remove::<PlaylistTracks>(TRACKS_KEY).await?;
        }
        self.session.insert(PLAYLIST_ID_KEY, playlist_id).await
    }

    pub async fn tracks(&self) -> Result<PlaylistTracks> {
        Ok(self.session.get(TRACKS_KEY).await?.unwrap_or_default())
    }

    pub async fn set_tracks(&self, tracks: &PlaylistTracks) -> Result<()> {
        self.session.insert(TRACKS_KEY, tracks).await
    }

    pub async fn issue_oauth_state(&self, state: &str) -> Result<()> {
        self.session.insert(OAUTH_STATE_KEY, state).await
    }

    /// Removes and returns the pending OAuth state; each state is single-use.
    pub async fn take_oauth_state(&self) -> Result<Option<String>> {
        self.session.remove(OAUTH_STATE_KEY).await
    }

    /// New session id for the same data, issued once the user has logged in.
    pub async fn cycle_id(&self) -> Result<()> {
        self.session.cycle_id().await
    }
}
