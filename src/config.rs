//! Configuration management for spotauth.
//!
//! This module loads configuration values from environment variables and a
//! `.env` file. It provides a central place for the Spotify application
//! credentials, the base URLs of the accounts service and the Web API, and
//! the settings of the local callback server used by the login command.
//!
//! Values are resolved in this order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Defaults for the public Spotify endpoints and the callback server

use std::{env, path::PathBuf};

use crate::{
    error::{Error, Result},
    spotify::ClientConfig,
    utils,
};

/// Base URL of the Spotify accounts service.
pub const DEFAULT_AUTH_BASE_URL: &str = "https://accounts.spotify.com";

/// Base URL of the Spotify Web API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";

pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory if it doesn't exist and loads variables from
/// `spotauth/.env` under the platform-specific local data directory:
/// - Linux: `~/.local/share/spotauth/.env`
/// - macOS: `~/Library/Application Support/spotauth/.env`
/// - Windows: `%LOCALAPPDATA%/spotauth/.env`
///
/// A missing file is not an error; variables already present in the
/// environment win over the file.
///
/// # Errors
///
/// Returns [`Error::Config`] if the directory cannot be created or the file
/// exists but cannot be parsed.
pub async fn load_env() -> Result<()> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::Config(format!("creating {}: {e}", parent.display())))?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map_err(|e| Error::Config(format!("loading {}: {e}", path.display())))
}

/// Location of the `.env` file read by [`load_env`].
pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotauth/.env");
    path
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("{name} must be set")))
}

fn or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Returns the address the local OAuth callback server binds to.
///
/// Reads `SERVER_ADDRESS`, e.g. `127.0.0.1:8888`.
pub fn server_addr() -> String {
    or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Returns the Spotify application's client ID from
/// `SPOTIFY_API_AUTH_CLIENT_ID`.
pub fn spotify_client_id() -> Result<String> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Returns the Spotify application's client secret from
/// `SPOTIFY_API_AUTH_CLIENT_SECRET`.
///
/// # Security Note
///
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
pub fn spotify_client_secret() -> Result<String> {
    required("SPOTIFY_API_AUTH_CLIENT_SECRET")
}

/// Returns the redirect URI registered for the application, read from
/// `SPOTIFY_API_REDIRECT_URI`.
///
/// It must point at the callback route of the local server, e.g.
/// `http://127.0.0.1:8888/callback`.
pub fn spotify_redirect_uri() -> String {
    or_default("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Returns the default scopes requested during authorization.
///
/// Reads the space separated `SPOTIFY_API_AUTH_SCOPE`, e.g.
/// `user-read-private user-follow-read`.
pub fn spotify_scopes() -> Vec<String> {
    utils::split_scopes(&or_default("SPOTIFY_API_AUTH_SCOPE", ""))
}

/// Returns the accounts service base URL from `SPOTIFY_API_AUTH_URL`.
pub fn spotify_apiauth_url() -> String {
    or_default("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_BASE_URL)
}

/// Returns the Web API base URL from `SPOTIFY_API_URL`.
pub fn spotify_apiurl() -> String {
    or_default("SPOTIFY_API_URL", DEFAULT_API_BASE_URL)
}

/// Assembles a [`ClientConfig`] from the environment.
///
/// # Errors
///
/// Returns [`Error::Config`] when the client credentials are missing or a
/// base URL is malformed.
pub fn client_config() -> Result<ClientConfig> {
    ClientConfig::new(
        &spotify_apiauth_url(),
        &spotify_apiurl(),
        spotify_client_id()?,
        spotify_client_secret()?,
    )
}
