use crate::{
    error::{AppError, Result},
    oauth::generate_state,
    session::UserSession,
    types::OAuthCallback,
    AppState,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, info, warn};

// Initiate OAuth login flow
pub async fn login(State(state): State<AppState>, session: UserSession) -> Result<Redirect> {
    let oauth_state = generate_state();
    session.issue_oauth_state(&oauth_state).await?;

    let auth_url = state.oauth.authorization_url_with_state(&oauth_state);

    info!("Redirecting to Spotify authorization");
    debug!(
        "Auth params: client_id={}, redirect_uri={}",
        state.config.client_id, state.config.redirect_uri
    );
    Ok(Redirect::to(&auth_url))
}

// Handle OAuth callback
pub async fn callback(
    State(state): State<AppState>,
    session: UserSession,
    Query(params): Query<OAuthCallback>,
) -> Result<Response> {
    // Provider errors (e.g. access_denied) are shown as-is
    if let Some(error) = params.error {
        warn!("OAuth error: {}", error);
        return Ok((StatusCode::BAD_REQUEST, format!("Error: {}", error)).into_response());
    }

    let Some(code) = params.code else {
        debug!("Callback without code or error");
        return Ok(Redirect::to("/").into_response());
    };

    let expected_state = session.take_oauth_state().await?;
    match (expected_state, params.state) {
        (Some(expected), Some(received)) if expected == received => {}
        (expected, received) => {
            warn!(
                "OAuth state mismatch (pending: {}, received: {})",
                expected.is_some(),
                received.is_some()
            );
            return Err(AppError::InvalidState);
        }
    }

    let tokens = state
        .oauth
        .exchange_code(&code)
        .await
        .map_err(AppError::TokenExchange)?;

    session.cycle_id().await?;
    session.set_tokens(&tokens).await?;

    info!("Spotify login complete, token expires at {}", tokens.expires_at);
    Ok(Redirect::to("/").into_response())
}
