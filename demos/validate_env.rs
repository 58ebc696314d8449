use bsides_loader::config;
use bsides_loader::spotify_handler::SpotifyHandler;

/// Example checking the Spotify credentials end to end
///
/// Validates the environment, then forces a client-credentials token request
/// and looks up one track.
#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    config::load_env();

    println!("Validating required environment variables...");
    match config::validate_env_vars() {
        Ok(()) => println!("✓ All required environment variables are set"),
        Err(e) => {
            eprintln!("✗ Configuration error: {e}");
            std::process::exit(1);
        }
    }

    let handler = match SpotifyHandler::new() {
        Ok(handler) => handler,
        Err(e) => {
            eprintln!("✗ Failed to create SpotifyHandler: {e}");
            std::process::exit(1);
        }
    };

    match handler.authenticate().await {
        Ok(()) => println!("✓ Authenticated with client credentials"),
        Err(e) => {
            eprintln!("✗ Authentication failed: {e}");
            std::process::exit(1);
        }
    }

    match handler.track("11dFghVXANMlKmJXsNCbNl").await {
        Ok(track) => {
            let artist = track.artists.first().map_or("unknown", |a| a.name.as_str());
            println!("  {} - {} ({})", artist, track.name, track.album.name);
        }
        Err(e) => eprintln!("Error fetching track: {e}"),
    }
}
