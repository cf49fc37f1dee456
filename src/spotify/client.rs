use std::{fmt, sync::Arc};

use chrono::Utc;
use reqwest::{
    Method, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use url::{Url, form_urlencoded};

use crate::{
    error::{Error, RequestError, Result},
    spotify::AuthenticatedUser,
    transport::{ReqwestTransport, Transport},
    types::{RequestOptions, SpotifyResponse, TokenResponse},
    utils,
};

/// Credentials and base URLs of a registered Spotify application.
///
/// Both base URLs are parsed on construction, so a `ClientConfig` always
/// holds absolute URLs. The client secret is redacted from `Debug` output.
#[derive(Clone)]
pub struct ClientConfig {
    auth_base_url: Url,
    api_base_url: Url,
    client_id: String,
    client_secret: String,
}

impl ClientConfig {
    /// Parses both base URLs and fails with [`Error::Config`] if either is
    /// not an absolute URL with a host.
    ///
    /// # Example
    ///
    /// ```
    /// let config = ClientConfig::new(
    ///     "https://accounts.spotify.com",
    ///     "https://api.spotify.com/v1",
    ///     "client-id",
    ///     "client-secret",
    /// )?;
    /// ```
    pub fn new(
        auth_base_url: &str,
        api_base_url: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        Ok(ClientConfig {
            auth_base_url: parse_base_url("authorization", auth_base_url)?,
            api_base_url: parse_base_url("API", api_base_url)?,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        })
    }

    pub fn auth_base_url(&self) -> &Url {
        &self.auth_base_url
    }

    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("auth_base_url", &self.auth_base_url.as_str())
            .field("api_base_url", &self.api_base_url.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

fn parse_base_url(kind: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| Error::Config(format!("invalid {kind} base URL '{raw}': {e}")))?;
    if !url.has_host() {
        return Err(Error::Config(format!(
            "{kind} base URL '{raw}' has no host"
        )));
    }
    Ok(url)
}

/// Appends `path` to `base` verbatim, so `https://host/v1` and `/me`
/// become `https://host/v1/me`.
fn join_url(base: &Url, path: &str) -> std::result::Result<Url, url::ParseError> {
    Url::parse(&format!("{}{}", base.as_str().trim_end_matches('/'), path))
}

/// Entry point of the authorization code flow.
///
/// Owns the application configuration and the [`Transport`] used for every
/// request, including those issued by the [`AuthenticatedUser`]s it mints.
/// Cloning is cheap and yields a handle to the same client, which is how
/// users keep their client alive.
#[derive(Clone)]
pub struct SpotifyClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    authorize_endpoint: Url,
    token_endpoint: Url,
    basic_authorization: HeaderValue,
    transport: Arc<dyn Transport>,
}

impl SpotifyClient {
    /// Creates a client that talks to the network through
    /// [`ReqwestTransport`].
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Creates a client that sends every request through `transport`.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let authorize_endpoint = join_url(&config.auth_base_url, "/authorize")
            .map_err(|e| Error::Config(format!("cannot build authorize endpoint: {e}")))?;
        let token_endpoint = join_url(&config.auth_base_url, "/api/token")
            .map_err(|e| Error::Config(format!("cannot build token endpoint: {e}")))?;

        let mut basic_authorization = HeaderValue::from_str(&utils::basic_credentials(
            &config.client_id,
            &config.client_secret,
        ))
        .map_err(|e| Error::InvalidHeader(format!("client credentials: {e}")))?;
        basic_authorization.set_sensitive(true);

        Ok(SpotifyClient {
            inner: Arc::new(ClientInner {
                config,
                authorize_endpoint,
                token_endpoint,
                basic_authorization,
                transport,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// URL of the token endpoint used by both grant types.
    pub fn token_endpoint(&self) -> &Url {
        &self.inner.token_endpoint
    }

    /// Returns `true` if both handles refer to the same client.
    pub fn ptr_eq(&self, other: &SpotifyClient) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Builds the URL the user opens to grant access.
    ///
    /// The result is `{auth_base_url}/authorize` with `client_id`,
    /// `response_type=code`, `redirect_uri`, `state`, `scope` (scopes joined
    /// by a single space, order preserved) and `show_dialog`. Identical
    /// input always yields an identical URL.
    ///
    /// # Example
    ///
    /// ```
    /// let url = client.authorization_url(
    ///     "http://127.0.0.1:8888/callback",
    ///     &["user-read-private", "user-follow-read"],
    ///     "xyz",
    ///     false,
    /// );
    /// webbrowser::open(url.as_str())?;
    /// ```
    pub fn authorization_url<S: AsRef<str>>(
        &self,
        redirect_url: &str,
        scopes: &[S],
        state: &str,
        show_dialog: bool,
    ) -> Url {
        let scope = scopes
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<&str>>()
            .join(" ");

        let mut url = self.inner.authorize_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.inner.config.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", redirect_url)
            .append_pair("state", state)
            .append_pair("scope", &scope)
            .append_pair("show_dialog", &show_dialog.to_string());
        url
    }

    /// Exchanges an authorization code for a token pair and returns the
    /// user it belongs to.
    ///
    /// `redirect_url` must be the one used to build the authorization URL.
    /// A non-200 answer fails with [`Error::Request`] and is never retried.
    /// The user's granted scopes come from the token response, not from
    /// the scopes that were requested.
    pub async fn get_user(&self, code: &str, redirect_url: &str) -> Result<AuthenticatedUser> {
        let token = self
            .request_token(
                "failed to exchange authorization code",
                &[
                    ("grant_type", "authorization_code"),
                    ("code", code),
                    ("redirect_uri", redirect_url),
                ],
            )
            .await?;

        let Some(refresh_token) = token.refresh_token else {
            return Err(Error::Parse {
                url: self.inner.token_endpoint.clone(),
                detail: "token response is missing refresh_token".to_string(),
            });
        };
        let expiry = self.expiry_for(token.expires_in)?;

        Ok(AuthenticatedUser::from_parts(
            self.clone(),
            token.access_token,
            expiry,
            refresh_token,
            utils::split_scopes(&token.scope),
        ))
    }

    /// POSTs a form to the token endpoint with the client's Basic
    /// credentials and parses the token response.
    ///
    /// Anything but 200 fails with a [`RequestError`] carrying `message`.
    pub(crate) async fn request_token(
        &self,
        message: &str,
        params: &[(&str, &str)],
    ) -> Result<TokenResponse> {
        let url = self.inner.token_endpoint.clone();

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.inner.basic_authorization.clone());
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        let options = RequestOptions {
            method: Method::POST,
            headers,
        };

        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();

        let response = self.send(url.clone(), options, Some(body)).await?;
        tracing::debug!(%url, status = %response.status, "token endpoint responded");

        if response.status != StatusCode::OK {
            return Err(RequestError::new(message, url, response).into());
        }

        response
            .body
            .deserialize::<TokenResponse>()
            .map_err(|e| Error::Parse {
                url,
                detail: format!("invalid token response: {e}"),
            })
    }

    /// Resolves `endpoint` against the API base URL.
    pub(crate) fn api_url(&self, endpoint: &str) -> Result<Url> {
        join_url(&self.inner.config.api_base_url, endpoint).map_err(|source| {
            Error::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                source,
            }
        })
    }

    pub(crate) async fn send(
        &self,
        url: Url,
        options: RequestOptions,
        body: Option<String>,
    ) -> Result<SpotifyResponse> {
        self.inner.transport.send(url, options, body).await
    }

    pub(crate) fn expiry_for(&self, expires_in: u64) -> Result<chrono::DateTime<Utc>> {
        utils::expiry_after(Utc::now(), expires_in).ok_or_else(|| Error::Parse {
            url: self.inner.token_endpoint.clone(),
            detail: format!("expires_in {expires_in} is out of range"),
        })
    }
}

impl fmt::Debug for SpotifyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyClient")
            .field("config", &self.inner.config)
            .field("transport", &self.inner.transport)
            .finish()
    }
}
