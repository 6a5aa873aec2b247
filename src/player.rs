use crate::{
    error::{AppError, Result},
    link::PlaylistId,
    session::UserSession,
    views, AppState,
};
use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const PLAYER_SCRIPT: &str = include_str!("../static/player.js");

#[derive(Debug, Deserialize)]
pub struct PlaylistForm {
    #[serde(default)]
    pub playlist_link: String,
}

#[derive(Debug, Serialize)]
pub struct PlayerData {
    pub token: String,
    pub uris: Vec<String>,
    pub images: Vec<Option<String>>,
}

pub async fn index() -> Html<String> {
    views::index_page(None)
}

pub async fn submit_playlist(
    session: UserSession,
    Form(form): Form<PlaylistForm>,
) -> Result<Response> {
    match form.playlist_link.parse::<PlaylistId>() {
        Ok(playlist_id) => {
            info!("Playlist selected: {}", playlist_id);
            session.set_playlist_id(&playlist_id).await?;
            Ok(Redirect::to("/fetch_tracks").into_response())
        }
        Err(e) => {
            debug!("Rejected playlist link {:?}", form.playlist_link);
            Ok(views::index_page(Some(&e.to_string())).into_response())
        }
    }
}

pub async fn fetch_tracks(
    State(state): State<AppState>,
    session: UserSession,
) -> Result<Redirect> {
    let Some(access_token) = session.access_token(Utc::now()).await? else {
        return Ok(Redirect::to("/login"));
    };
    let Some(playlist_id) = session.playlist_id().await? else {
        return Ok(Redirect::to("/"));
    };

    let tracks = state
        .playlists
        .fetch_tracks(&access_token, &playlist_id)
        .await
        .map_err(AppError::PlaylistFetch)?;

    session.set_tracks(&tracks).await?;
    Ok(Redirect::to("/player"))
}

pub async fn player(session: UserSession) -> Result<Response> {
    let Some(access_token) = session.access_token(Utc::now()).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    let tracks = session.tracks().await?;
    if tracks.is_empty() {
        return Ok(views::no_tracks_page().into_response());
    }

    Ok(views::player_page(&access_token, &tracks.uris()).into_response())
}

pub async fn player_data(session: UserSession) -> Result<Json<PlayerData>> {
    let token = session
        .access_token(Utc::now())
        .await?
        .ok_or(AppError::Unauthorized)?;

    let tracks = session.tracks().await?;
    if tracks.is_empty() {
        return Err(AppError::Unauthorized);
    }

    Ok(Json(PlayerData {
        token,
        uris: tracks.uris(),
        images: tracks.images(),
    }))
}

pub async fn player_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        PLAYER_SCRIPT,
    )
}
