#![allow(dead_code)]

use axum::{
    extract::{Path, Query},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;
use spotify_web_player::{config::Config, router, AppState};
use std::{collections::HashMap, net::SocketAddr, time::Duration};
use tokio::net::TcpListener;

pub const CLIENT_ID: &str = "test-client-id";
pub const CLIENT_SECRET: &str = "test-client-secret";
pub const AUTH_CODE: &str = "good-code";
pub const ACCESS_TOKEN: &str = "access-123";
pub const PLAYLIST_ID: &str = "37i9dQZF1DXcBWIGoYBM5M";
/// Accepted by the token endpoint, which then answers 200 with an empty object.
pub const EMPTY_TOKEN_CODE: &str = "empty-token-code";
/// Answered with 200 and an empty object instead of a tracks page.
pub const EMPTY_PLAYLIST_ID: &str = "emptyPlaylistPage";

pub fn test_config(upstream: &str) -> Config {
    Config {
        port: 0,
        session_secret: "integration-test-secret".to_string(),
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        redirect_uri: "http://127.0.0.1:5000/callback".to_string(),
        accounts_base_url: upstream.to_string(),
        api_base_url: format!("{}/v1", upstream),
        cors_allow_origins: vec!["http://localhost:3000".to_string()],
        cookie_secure: false,
    }
}

pub fn test_app(upstream: &str) -> Router {
    router(AppState::new(test_config(upstream)).expect("build app state"))
}

async fn token(Form(form): Form<HashMap<String, String>>) -> impl IntoResponse {
    let field = |name: &str| form.get(name).map(String::as_str);
    if field("code") == Some(EMPTY_TOKEN_CODE) {
        return (StatusCode::OK, Json(json!({})));
    }

    let valid = field("grant_type") == Some("authorization_code")
        && field("code") == Some(AUTH_CODE)
        && field("client_id") == Some(CLIENT_ID)
        && field("client_secret") == Some(CLIENT_SECRET)
        && field("redirect_uri") == Some("http://127.0.0.1:5000/callback");

    if !valid {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "access_token": ACCESS_TOKEN,
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "refresh-456",
            "scope": "streaming"
        })),
    )
}

async fn playlist_tracks(
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let bearer = format!("Bearer {}", ACCESS_TOKEN);
    if headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some(bearer.as_str())
    {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": { "status": 401, "message": "Invalid access token" } })),
        );
    }

    if id == EMPTY_PLAYLIST_ID {
        return (StatusCode::OK, Json(json!({})));
    }

    if id != PLAYLIST_ID || query.get("limit").map(String::as_str) != Some("100") {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "status": 404, "message": "Resource not found" } })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "items": [
                { "track": {
                    "uri": "spotify:track:first",
                    "album": { "images": [
                        { "url": "https://i.scdn.co/image/first-640" },
                        { "url": "https://i.scdn.co/image/first-300" }
                    ] }
                } },
                { "track": null },
                { "track": { "uri": "spotify:episode:podcast", "album": null } },
                { "track": { "uri": "spotify:track:second", "album": { "images": [] } } },
                { "track": {
                    "uri": "spotify:track:third",
                    "album": { "images": [{ "url": "https://i.scdn.co/image/third-640" }] }
                } }
            ],
            "total": 5,
            "limit": 100,
            "next": null
        })),
    )
}

/// Minimal stand-in for the Spotify accounts service and Web API.
pub fn mock_spotify() -> Router {
    Router::new()
        .route("/api/token", post(token))
        .route("/v1/playlists/:id/tracks", get(playlist_tracks))
}

pub async fn spawn(app: Router) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server should run");
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, handle)
}
