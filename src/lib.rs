use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tower_sessions::{cookie::SameSite, MemoryStore, SessionManagerLayer};
use tracing::warn;

pub mod auth;
pub mod config;
pub mod error;
pub mod link;
pub mod oauth;
pub mod player;
pub mod playlist;
pub mod session;
pub mod types;
pub mod views;

use crate::{
    config::Config, oauth::OAuthClient, playlist::PlaylistFetcher, session::SESSION_COOKIE_NAME,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub oauth: OAuthClient,
    pub playlists: PlaylistFetcher,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        // Shared by the token exchange and the playlist fetch
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            oauth: OAuthClient::new(config.clone(), http_client.clone()),
            playlists: PlaylistFetcher::new(config.clone(), http_client),
            config,
        })
    }
}

pub fn router(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(state.config.cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_signed(state.config.session_key());

    let origins: Vec<HeaderValue> = state
        .config
        .cors_allow_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_credentials(true);

    Router::new()
        .route("/", get(player::index).post(player::submit_playlist))
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback))
        .route("/fetch_tracks", get(player::fetch_tracks))
        .route("/player", get(player::player))
        .route("/player_data", get(player::player_data))
        .route("/static/player.js", get(player::player_script))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(session_layer),
        )
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
