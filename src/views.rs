use axum::response::Html;
use serde::Serialize;

const STYLE: &str = r#"
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 640px;
            margin: 50px auto;
            padding: 20px;
            background-color: #f5f5f5;
        }
        .container {
            background: white;
            padding: 2rem;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        h1, h2 {
            color: #2d3748;
        }
        input[type="text"] {
            width: 100%;
            padding: 0.75rem;
            border: 1px solid #e2e8f0;
            border-radius: 4px;
            font-size: 1rem;
            margin: 0.5rem 0;
            box-sizing: border-box;
        }
        button, input[type="submit"] {
            background: #1db954;
            color: white;
            border: none;
            padding: 0.75rem 1.5rem;
            border-radius: 4px;
            font-size: 1rem;
            cursor: pointer;
            margin: 0.5rem 0.25rem 0.5rem 0;
        }
        .error {
            color: #f56565;
            font-weight: bold;
        }
        #cover {
            width: 300px;
            height: 300px;
            object-fit: cover;
            border-radius: 50%;
            display: block;
            margin: 1rem auto;
            background: #2d3748;
        }
    </style>
"#;

/// Playlist submission form. `error` must not contain user input.
pub fn index_page(error: Option<&str>) -> Html<String> {
    let error = error
        .map(|message| format!(r#"<p class="error">{}</p>"#, message))
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Spotify Web Player</title>
    {STYLE}
</head>
<body>
    <div class="container">
        <h1>Spotify Web Player</h1>
        <form method="post" action="/">
            <input type="text" name="playlist_link" placeholder="Paste Spotify playlist link" required>
            <input type="submit" value="Load Playlist">
        </form>
        {error}
        <p><a href="/login">Login with Spotify</a></p>
    </div>
</body>
</html>
"#
    ))
}

pub fn no_tracks_page() -> Html<&'static str> {
    Html(
        r#"<h2>No available tracks. Please load a playlist first.</h2><p><a href="/">Go back</a></p>"#,
    )
}

#[derive(Serialize)]
struct PlayerData<'a> {
    token: &'a str,
    uris: &'a [String],
}

/// Player page. The token and uris are handed to `/static/player.js` as globals.
pub fn player_page(token: &str, uris: &[String]) -> Html<String> {
    let data = script_json(&PlayerData { token, uris });

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Spotify Web Player</title>
    {STYLE}
</head>
<body>
    <div class="container">
        <h1>Spotify Web Player</h1>
        <img id="cover" alt="">
        <p id="status">Loading player...</p>
        <button onclick="previousTrack()">Previous</button>
        <button id="playPauseBtn" onclick="togglePlayPause()">Play</button>
        <button onclick="nextTrack()">Next</button>
        <p><a href="/">Load another playlist</a></p>
    </div>
    <script>
        const playerData = {data};
        const token = playerData.token;
        const uris = playerData.uris;
    </script>
    <script src="/static/player.js"></script>
    <script src="https://sdk.scdn.co/spotify-player.js"></script>
</body>
</html>
"#
    ))
}

// serde_json leaves `</` alone, which would close the surrounding script tag
fn script_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}
