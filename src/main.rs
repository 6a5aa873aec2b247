use anyhow::Result;
use spotify_web_player::{config::Config, router, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spotify_web_player=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Starting Spotify web player");
    info!("OAuth redirect URI: {}", config.redirect_uri);

    let app_state = AppState::new(config)?;
    let addr = app_state.config.server_address();
    let port = app_state.config.port;
    let app = router(app_state);

    info!("Listening on {}", addr);

    println!("\nSpotify Web Player");
    println!("==================");
    println!("Server running at: http://localhost:{}", port);
    println!("  Login:  http://localhost:{}/login", port);
    println!("  Health: http://localhost:{}/health\n", port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
