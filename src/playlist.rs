use crate::{
    config::Config,
    error::UpstreamError,
    link::PlaylistId,
    types::{PlaylistItem, PlaylistTracksPage},
};
use axum::http::header;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};
use url::Url;

const TRACK_URI_PREFIX: &str = "spotify:track:";

/// Only the first page is fetched.
pub const PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TrackEntry {
    uri: String,
    image: Option<String>,
}

/// Playable tracks of a playlist in provider order, each paired with its
/// cover image (if any). Uris and images always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistTracks(Vec<TrackEntry>);

impl PlaylistTracks {
    pub fn from_items(items: Vec<PlaylistItem>) -> Self {
        let entries = items
            .into_iter()
            .filter_map(|item| item.track)
            .filter_map(|track| {
                let uri = track.uri.filter(|uri| uri.starts_with(TRACK_URI_PREFIX))?;
                let image = track
                    .album
                    .and_then(|album| album.images)
                    .and_then(|images| images.into_iter().next())
                    .map(|image| image.url);
                Some(TrackEntry { uri, image })
            })
            .collect();
        Self(entries)
    }

    pub fn uris(&self) -> Vec<String> {
        self.0.iter().map(|entry| entry.uri.clone()).collect()
    }

    pub fn images(&self) -> Vec<Option<String>> {
        self.0.iter().map(|entry| entry.image.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct PlaylistFetcher {
    config: Arc<Config>,
    http_client: reqwest::Client,
}

impl PlaylistFetcher {
    pub fn new(config: Arc<Config>, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// `{api_base_url}/playlists/{id}/tracks`, with the id encoded as a single path segment.
    pub fn tracks_url(&self, playlist_id: &PlaylistId) -> Result<Url, UpstreamError> {
        let invalid = || UpstreamError::InvalidUrl(self.config.api_base_url.clone());

        let mut url = Url::parse(&self.config.api_base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push("playlists")
            .push(playlist_id.as_str())
            .push("tracks");
        Ok(url)
    }

    pub async fn fetch_tracks(
        &self,
        access_token: &str,
        playlist_id: &PlaylistId,
    ) -> Result<PlaylistTracks, UpstreamError> {
        let url = self.tracks_url(playlist_id)?;
        debug!("Fetching playlist tracks from: {}", url);

        let response = self
            .http_client
            .get(url)
            .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
            .query(&[("limit", PAGE_LIMIT)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                "Playlist {} fetch failed ({}): {}",
                playlist_id, status, error_text
            );
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let body = response.bytes().await?;
        let page: PlaylistTracksPage = serde_json::from_slice(&body)
            .map_err(|e| UpstreamError::Malformed(format!("playlist tracks: {}", e)))?;

        let fetched = page.items.len();
        let tracks = PlaylistTracks::from_items(page.items);
        info!(
            "Playlist {}: kept {} of {} items",
            playlist_id,
            tracks.len(),
            fetched
        );

        Ok(tracks)
    }
}
