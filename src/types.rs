use crate::error::UpstreamError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tokens obtained from the authorization code exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBundle {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl TokenBundle {
    pub fn from_response(
        response: TokenResponse,
        now: DateTime<Utc>,
    ) -> Result<Self, UpstreamError> {
        let expires_at = i64::try_from(response.expires_in)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                UpstreamError::Malformed(format!(
                    "token lifetime out of range: {}",
                    response.expires_in
                ))
            })?;

        Ok(Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub grant_type: &'a str,
    pub code: &'a str,
    pub redirect_uri: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub refresh_token: String,
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OAuthCallback {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// One page of `GET /playlists/{id}/tracks`.
#[derive(Debug, Deserialize)]
pub struct PlaylistTracksPage {
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItem {
    // null for tracks removed from the catalogue
    #[serde(default)]
    pub track: Option<TrackObject>,
}

#[derive(Debug, Deserialize)]
pub struct TrackObject {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub album: Option<AlbumObject>,
}

#[derive(Debug, Deserialize)]
pub struct AlbumObject {
    // Spotify sends null as well as [] for albums without art
    #[serde(default)]
    pub images: Option<Vec<ImageObject>>,
}

#[derive(Debug, Deserialize)]
pub struct ImageObject {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn response(expires_in: u64) -> TokenResponse {
        TokenResponse {
            access_token: "access".into(),
            token_type: "Bearer".into(),
            expires_in,
            refresh_token: "refresh".into(),
            scope: None,
        }
    }

    #[test]
    fn bundle_expiry_is_relative_to_exchange_time() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let bundle = TokenBundle::from_response(response(3600), now).unwrap();

        assert_eq!(bundle.expires_at, now + Duration::hours(1));
        assert!(!bundle.is_expired(now));
        assert!(bundle.is_expired(now + Duration::hours(1)));
    }

    #[test]
    fn out_of_range_lifetimes_are_malformed() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        for expires_in in [100_000_000_000_000_000, i64::MAX as u64, u64::MAX] {
            let err = TokenBundle::from_response(response(expires_in), now).unwrap_err();
            assert!(
                matches!(err, UpstreamError::Malformed(_)),
                "{expires_in}: {err}"
            );
        }
    }

    #[test]
    fn bundle_serializes_expiry_as_epoch_seconds() {
        let bundle = TokenBundle {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        };
        let value = serde_json::to_value(&bundle).unwrap();
        assert_eq!(value["expires_at"], 1_700_000_000);
    }

    #[test]
    fn null_album_images_deserialize_as_none() {
        let page: PlaylistTracksPage = serde_json::from_value(serde_json::json!({
            "items": [{ "track": { "uri": "spotify:track:a", "album": { "images": null } } }]
        }))
        .unwrap();
        let album = page.items[0].track.as_ref().unwrap().album.as_ref().unwrap();
        assert!(album.images.is_none());
    }

    #[test]
    fn null_and_missing_tracks_deserialize_as_none() {
        let page: PlaylistTracksPage = serde_json::from_value(serde_json::json!({
            "items": [{ "track": null }, {}]
        }))
        .unwrap();
        assert!(page.items.iter().all(|item| item.track.is_none()));
    }
}
