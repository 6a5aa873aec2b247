use anyhow::{Context, Result};
use sha2::{Digest, Sha512};
use std::fmt;
use std::net::SocketAddr;
use tower_sessions::cookie::Key;
use url::Url;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub session_secret: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub accounts_base_url: String,
    pub api_base_url: String,
    pub cors_allow_origins: Vec<String>,
    pub cookie_secure: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let redirect_uri = var("REDIRECT_URI")
            .unwrap_or_else(|| "http://127.0.0.1:5000/callback".to_string());
        Url::parse(&redirect_uri).context("Invalid REDIRECT_URI")?;

        let accounts_base_url = base_url(
            var("ACCOUNTS_BASE_URL")
                .unwrap_or_else(|| "https://accounts.spotify.com".to_string()),
        )
        .context("Invalid ACCOUNTS_BASE_URL")?;

        let api_base_url = base_url(
            var("API_BASE_URL").unwrap_or_else(|| "https://api.spotify.com/v1".to_string()),
        )
        .context("Invalid API_BASE_URL")?;

        Ok(Self {
            port: var("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse()
                .context("Invalid PORT")?,

            session_secret: var("SECRET_KEY").unwrap_or_else(|| {
                // Sessions won't survive a restart without a configured secret
                use rand::Rng;
                let secret: Vec<u8> = (0..32).map(|_| rand::thread_rng().gen()).collect();
                base64::Engine::encode(&base64::engine::general_purpose::STANDARD, secret)
            }),

            client_id: var("CLIENT_ID").context("CLIENT_ID must be set")?,

            client_secret: var("CLIENT_SECRET").context("CLIENT_SECRET must be set")?,

            redirect_uri,
            accounts_base_url,
            api_base_url,

            cors_allow_origins: var("CORS_ALLOW_ORIGINS")
                .unwrap_or_else(|| "http://localhost:3000".to_string())
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),

            cookie_secure: var("COOKIE_SECURE")
                .map(|v| v.parse::<bool>())
                .transpose()
                .context("Invalid COOKIE_SECURE")?
                .unwrap_or(false),
        })
    }

    pub fn server_address(&self) -> SocketAddr {
        ([0, 0, 0, 0], self.port).into()
    }

    /// Cookie signing key. The secret is stretched to the 64 bytes `Key` needs.
    pub fn session_key(&self) -> Key {
        let digest = Sha512::digest(self.session_secret.as_bytes());
        Key::from(digest.as_slice())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("session_secret", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("accounts_base_url", &self.accounts_base_url)
            .field("api_base_url", &self.api_base_url)
            .field("cors_allow_origins", &self.cors_allow_origins)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

fn base_url(raw: String) -> Result<String> {
    Url::parse(&raw)?;
    Ok(raw.trim_end_matches('/').to_string())
}
