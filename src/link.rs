use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const WEB_PLAYLIST_MARKER: &str = "open.spotify.com/playlist/";
const PLAYLIST_URI_PREFIX: &str = "spotify:playlist:";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid Spotify playlist link.")]
pub struct InvalidPlaylistLink;

/// Playlist id extracted from a pasted link. The id itself is not validated;
/// Spotify rejects unknown ids when the tracks are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(String);

impl PlaylistId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PlaylistId {
    type Err = InvalidPlaylistLink;

    /// Accepts `https://open.spotify.com/playlist/<id>[?...]` and
    /// `spotify:playlist:<id>`.
    fn from_str(link: &str) -> Result<Self, Self::Err> {
        let link = link.trim();

        let id = if let Some((_, rest)) = link.split_once(WEB_PLAYLIST_MARKER) {
            rest.split('?').next().unwrap_or_default()
        } else if link.starts_with(PLAYLIST_URI_PREFIX) {
            link.rsplit(':').next().unwrap_or_default()
        } else {
            return Err(InvalidPlaylistLink);
        };

        if id.is_empty() {
            return Err(InvalidPlaylistLink);
        }

        Ok(Self(id.to_string()))
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
