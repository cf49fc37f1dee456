use std::fmt;

use chrono::{DateTime, Utc};
use reqwest::{
    StatusCode,
    header::{AUTHORIZATION, HeaderValue},
};

use crate::{
    error::{Error, RequestError, Result},
    spotify::SpotifyClient,
    types::{RequestOptions, SpotifyResponse},
    utils,
};

/// One Spotify identity and its current tokens.
///
/// Obtained from [`SpotifyClient::get_user`] or, when a refresh token is
/// already known, from [`AuthenticatedUser::from_refresh_token`]. The access
/// token, its expiry and the granted scopes change only through successful
/// refreshes. Tokens are left out of the `Debug` output.
#[derive(Clone)]
pub struct AuthenticatedUser {
    client: SpotifyClient,
    access_token: String,
    access_token_expiry: DateTime<Utc>,
    refresh_token: String,
    granted_scopes: Vec<String>,
}

impl AuthenticatedUser {
    pub(crate) fn from_parts(
        client: SpotifyClient,
        access_token: String,
        access_token_expiry: DateTime<Utc>,
        refresh_token: String,
        granted_scopes: Vec<String>,
    ) -> Self {
        AuthenticatedUser {
            client,
            access_token,
            access_token_expiry,
            refresh_token,
            granted_scopes,
        }
    }

    /// Builds a user from a refresh token obtained earlier.
    ///
    /// The user starts without an access token, so the first
    /// [`make_request`](Self::make_request) is rejected with 401 and
    /// triggers a refresh. Call
    /// [`refresh_access_token`](Self::refresh_access_token) first to avoid
    /// that round trip.
    pub fn from_refresh_token(client: SpotifyClient, refresh_token: impl Into<String>) -> Self {
        AuthenticatedUser {
            client,
            access_token: String::new(),
            access_token_expiry: Utc::now(),
            refresh_token: refresh_token.into(),
            granted_scopes: Vec::new(),
        }
    }

    pub fn client(&self) -> &SpotifyClient {
        &self.client
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn access_token_expiry(&self) -> DateTime<Utc> {
        self.access_token_expiry
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Scopes the provider reported for the current access token.
    pub fn granted_scopes(&self) -> &[String] {
        &self.granted_scopes
    }

    /// Whether the access token's reported lifetime has passed.
    ///
    /// Informational only; requests are never refreshed ahead of a 401.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.access_token_expiry
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// On success the access token, its expiry and the granted scopes are
    /// replaced; the refresh token is replaced only when the provider sends
    /// a new one. On failure nothing changes and the error is returned
    /// without retrying.
    pub async fn refresh_access_token(&mut self) -> Result<()> {
        let token = self
            .client
            .request_token(
                "failed to refresh access token",
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", self.refresh_token.as_str()),
                ],
            )
            .await?;
        let expiry = self.client.expiry_for(token.expires_in)?;

        self.access_token = token.access_token;
        self.access_token_expiry = expiry;
        self.granted_scopes = utils::split_scopes(&token.scope);
        if let Some(refresh_token) = token.refresh_token {
            self.refresh_token = refresh_token;
        }

        Ok(())
    }

    /// Calls `{api_base_url}{endpoint}` with this user's access token.
    ///
    /// Caller supplied headers are kept except `Authorization`, which is
    /// always set to the user's Bearer token. A 2xx response is returned as
    /// is. A 401 triggers one refresh and one retry with the new token; any
    /// other failure, or a failure of the retry, is returned as
    /// [`Error::Request`].
    ///
    /// # Example
    ///
    /// ```
    /// let response = user.make_request("/me", None, None).await?;
    /// let id = response.body.as_json().and_then(|v| v["id"].as_str());
    /// ```
    pub async fn make_request(
        &mut self,
        endpoint: &str,
        options: Option<RequestOptions>,
        body: Option<String>,
    ) -> Result<SpotifyResponse> {
        let url = self.client.api_url(endpoint)?;
        let mut options = options.unwrap_or_default();

        self.authorize(&mut options)?;
        let response = self
            .client
            .send(url.clone(), options.clone(), body.clone())
            .await?;

        if response.status.is_success() {
            return Ok(response);
        }
        if response.status != StatusCode::UNAUTHORIZED {
            return Err(RequestError::new("request failed", url, response).into());
        }

        tracing::debug!(%url, "access token rejected, refreshing before retry");
        self.refresh_access_token().await?;

        self.authorize(&mut options)?;
        let response = self.client.send(url.clone(), options, body).await?;

        if response.status.is_success() {
            Ok(response)
        } else {
            Err(RequestError::new(
                "request failed after refreshing access token",
                url,
                response,
            )
            .into())
        }
    }

    fn authorize(&self, options: &mut RequestOptions) -> Result<()> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.access_token))
            .map_err(|e| Error::InvalidHeader(format!("access token: {e}")))?;
        value.set_sensitive(true);
        options.headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

impl fmt::Debug for AuthenticatedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedUser")
            .field("client", &self.client)
            .field("access_token_expiry", &self.access_token_expiry)
            .field("granted_scopes", &self.granted_scopes)
            .finish_non_exhaustive()
    }
}
