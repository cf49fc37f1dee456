//! # CLI Module
//!
//! Command implementations for the `spotauth` binary. Each command drives
//! the library the way an application would: build a [`SpotifyClient`],
//! walk the user through authorization, and call the Web API through an
//! [`AuthenticatedUser`](crate::spotify::AuthenticatedUser).
//!
//! ## Commands
//!
//! - [`auth_url`] - Prints an authorization URL without starting a flow
//! - [`login`] - Full authorization code flow with a local callback server
//! - [`request`] - Calls an endpoint as the user owning a refresh token
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotauth auth-url --scope user-read-private --show-dialog
//! spotauth login --scope user-read-private --endpoint /me
//! spotauth request --refresh-token AQD... /me/following?type=artist
//! ```
//!
//! Failures are reported with the crate's output macros; fatal ones exit the
//! process with status 1.
//!
//! [`SpotifyClient`]: crate::spotify::SpotifyClient

mod auth;
mod request;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use auth::auth_url;
pub use auth::login;
pub use request::request;

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
