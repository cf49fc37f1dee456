use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use reqwest::Method;

use spotauth::{SpotifyClient, cli, config, error, utils, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the Spotify authorization URL
    AuthUrl(AuthUrlOptions),

    /// Authorize with Spotify in the browser and print the session
    Login(LoginOptions),

    /// Call a Web API endpoint as the owner of a refresh token
    Request(RequestOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthUrlOptions {
    /// Scope to request; can be repeated (defaults to SPOTIFY_API_AUTH_SCOPE)
    #[clap(long = "scope", action = ArgAction::Append)]
    pub scopes: Vec<String>,

    /// State parameter (random when omitted)
    #[clap(long)]
    pub state: Option<String>,

    /// Force the consent dialog even if access was granted before
    #[clap(long)]
    pub show_dialog: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct LoginOptions {
    /// Scope to request; can be repeated (defaults to SPOTIFY_API_AUTH_SCOPE)
    #[clap(long = "scope", action = ArgAction::Append)]
    pub scopes: Vec<String>,

    /// Force the consent dialog even if access was granted before
    #[clap(long)]
    pub show_dialog: bool,

    /// Endpoint to request once authorized, e.g. /me
    #[clap(long)]
    pub endpoint: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct RequestOptions {
    /// Refresh token of the user to act as
    #[clap(long)]
    pub refresh_token: String,

    /// HTTP method
    #[clap(long, default_value = "GET", value_parser = utils::parse_method)]
    pub method: Method,

    /// JSON request body
    #[clap(long)]
    pub data: Option<String>,

    /// Endpoint relative to the Web API base URL, e.g. /me
    pub endpoint: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn scopes_or_default(scopes: Vec<String>) -> Vec<String> {
    if scopes.is_empty() {
        config::spotify_scopes()
    } else {
        scopes
    }
}

fn build_client() -> SpotifyClient {
    let config = match config::client_config() {
        Ok(config) => config,
        Err(e) => error!("Cannot load client configuration. Err: {}", e),
    };

    match SpotifyClient::new(config) {
        Ok(client) => client,
        Err(e) => error!("Cannot create client. Err: {}", e),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("SPOTAUTH_LOG_LEVEL")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment file. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::AuthUrl(opt) => cli::auth_url(
            &build_client(),
            scopes_or_default(opt.scopes),
            opt.state,
            opt.show_dialog,
        ),
        Command::Login(opt) => {
            cli::login(
                &build_client(),
                scopes_or_default(opt.scopes),
                opt.show_dialog,
                opt.endpoint,
            )
            .await
        }
        Command::Request(opt) => {
            cli::request(
                &build_client(),
                opt.refresh_token,
                opt.endpoint,
                opt.method,
                opt.data,
            )
            .await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
