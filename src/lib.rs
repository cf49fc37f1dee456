//! Spotify OAuth2 authorization code client
//!
//! This library implements the authorization code flow against the Spotify
//! accounts service and an authenticated request path into the Spotify Web
//! API that refreshes an expired access token and retries once on 401.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error and result types
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - `SpotifyClient` and `AuthenticatedUser`
//! - `transport` - Pluggable request seam with the default `reqwest` transport
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spotauth::{ClientConfig, SpotifyClient};
//!
//! #[tokio::main]
//! async fn main() -> spotauth::Result<()> {
//!     let config = ClientConfig::new(
//!         "https://accounts.spotify.com",
//!         "https://api.spotify.com/v1",
//!         "client-id",
//!         "client-secret",
//!     )?;
//!     let client = SpotifyClient::new(config)?;
//!     let redirect = "http://127.0.0.1:8888/callback";
//!     let url = client.authorization_url(redirect, &["user-read-private"], "state", false);
//!     // ... user consents, the redirect delivers `code` ...
//!     let mut user = client.get_user("code", redirect).await?;
//!     let me = user.make_request("/me", None, None).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod spotify;
pub mod transport;
pub mod types;
pub mod utils;

pub use error::{Error, RequestError, Result};
pub use spotify::{AuthenticatedUser, ClientConfig, SpotifyClient};
pub use transport::{ReqwestTransport, Transport};

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("State: {}", state);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// The process terminates with exit code 1 right after printing, so this is
/// only for failures a command cannot recover from. Library code returns
/// [`Error`] instead.
///
/// # Example
///
/// ```
/// error!("Token exchange failed: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems, such as a browser that could not be
/// opened or a callback that carried the wrong state.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
