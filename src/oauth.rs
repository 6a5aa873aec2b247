use crate::{
    config::Config,
    error::UpstreamError,
    types::{TokenBundle, TokenRequest, TokenResponse},
};
use axum::http::header;
use base64::Engine;
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, error, info};

pub const SCOPES: &str = "streaming user-read-email user-read-private user-modify-playback-state playlist-read-private user-read-currently-playing";

// Generate random state parameter
pub fn generate_state() -> String {
    let random_bytes: Vec<u8> = (0..64).map(|_| rand::thread_rng().gen()).collect();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
}

#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: Arc<Config>,
    http_client: reqwest::Client,
}

impl OAuthClient {
    pub fn new(config: Arc<Config>, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Authorization endpoint URL. Always forces the consent dialog.
    pub fn authorization_url(&self) -> String {
        self.build_authorization_url(None)
    }

    pub fn authorization_url_with_state(&self, state: &str) -> String {
        self.build_authorization_url(Some(state))
    }

    fn build_authorization_url(&self, state: Option<&str>) -> String {
        let mut auth_params = vec![
            ("client_id", self.config.client_id.as_str()),
            ("response_type", "code"),
            ("scope", SCOPES),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("show_dialog", "true"),
        ];
        if let Some(state) = state {
            auth_params.push(("state", state));
        }

        // Serializing a list of string pairs cannot fail
        let query = serde_urlencoded::to_string(auth_params).unwrap_or_default();
        format!("{}/authorize?{}", self.config.accounts_base_url, query)
    }

    pub async fn exchange_code(&self, code: &str) -> Result<TokenBundle, UpstreamError> {
        let token_url = format!("{}/api/token", self.config.accounts_base_url);

        debug!("Exchanging authorization code at: {}", token_url);

        let request = TokenRequest {
            grant_type: "authorization_code",
            code,
            redirect_uri: &self.config.redirect_uri,
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
        };

        let response = self
            .http_client
            .post(&token_url)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Token exchange failed ({}): {}", status, error_text);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let response_text = response.text().await?;
        let token_response: TokenResponse = serde_json::from_str(&response_text)
            .map_err(|e| UpstreamError::Malformed(format!("token response: {}", e)))?;

        info!(
            "Token exchange succeeded, access token valid for {}s",
            token_response.expires_in
        );

        TokenBundle::from_response(token_response, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OAuthClient {
        let config = Config::from_vars(|key| match key {
            "CLIENT_ID" => Some("my client id".to_string()),
            "CLIENT_SECRET" => Some("top-secret-value".to_string()),
            "REDIRECT_URI" => Some("http://127.0.0.1:5000/callback".to_string()),
            _ => None,
        })
        .unwrap();
        OAuthClient::new(Arc::new(config), reqwest::Client::new())
    }

    #[test]
    fn authorization_url_carries_encoded_client_and_redirect() {
        let url = client().authorization_url();

        assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
        assert!(url.contains("client_id=my+client+id"));
        assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A5000%2Fcallback"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("show_dialog=true"));
        assert!(url.contains("scope=streaming+user-read-email"));
        assert!(!url.contains("top-secret-value"));
        assert!(!url.contains("state="));
    }

    #[test]
    fn authorization_url_is_deterministic() {
        let client = client();
        assert_eq!(client.authorization_url(), client.authorization_url());
    }

    #[test]
    fn state_is_appended_when_given() {
        let url = client().authorization_url_with_state("abc-123");
        let parsed = url::Url::parse(&url).unwrap();
        let state = parsed
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned());
        assert_eq!(state.as_deref(), Some("abc-123"));
    }

    #[test]
    fn generated_states_are_url_safe_and_unique() {
        let first = generate_state();
        let second = generate_state();
        assert_ne!(first, second);
        assert!(first
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
