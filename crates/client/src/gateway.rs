//! Session gateway: every backend call goes through here.
//!
//! For authorized requests the gateway:
//! 1. Attaches `Authorization: Bearer <accessToken>` from the credential store
//! 2. Sends the request
//! 3. On `401`, refreshes the token pair and retries the original request once
//! 4. If the refresh fails, clears the session and returns the original `401`
//!
//! Failures are returned as [`ApiError`] values; nothing here panics or leaks a
//! transport error to the caller.

use std::sync::Arc;

use lendwise_shared::auth::{RefreshRequest, RefreshResponse};
use lendwise_shared::{ApiEnvelope, ApiError, ApiResult};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::endpoints;
use crate::error::ClientError;
use crate::request::ApiRequest;
use crate::session::SessionContext;

/// A successful response: the envelope message plus its optional payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSuccess<T> {
    /// Message from the envelope.
    pub message: String,
    /// Payload, when the endpoint returns one.
    pub data: Option<T>,
}

impl<T> ApiSuccess<T> {
    /// Returns the payload, failing if the backend sent none.
    ///
    /// # Errors
    ///
    /// Returns a server-class `ApiError` when `data` is absent.
    pub fn into_data(self) -> ApiResult<T> {
        self.data
            .ok_or_else(|| ApiError::server("Response is missing data"))
    }
}

/// Wraps every backend call with bearer-token attachment and 401 recovery.
pub struct SessionGateway {
    client: Client,
    base_url: Url,
    session: Arc<SessionContext>,
    refresh_lock: Mutex<()>,
}

impl std::fmt::Debug for SessionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGateway")
            .field("base_url", &self.base_url.as_str())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl SessionGateway {
    /// Builds a gateway for `base_url`.
    ///
    /// No request timeout is set; transport defaults apply.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` when the reqwest client cannot be built.
    pub fn new(
        base_url: Url,
        user_agent: &str,
        session: Arc<SessionContext>,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(user_agent) {
            Ok(value) => {
                headers.insert(USER_AGENT, value);
            }
            Err(_) => warn!(user_agent, "Ignoring invalid user agent"),
        }
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
            session,
            refresh_lock: Mutex::new(()),
        })
    }

    /// Returns the session context this gateway reads tokens from.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Sends `request`, decoding the envelope payload as `T`.
    ///
    /// At most two attempts are made: the original, and one retry after a
    /// successful token refresh.
    pub async fn send<T: DeserializeOwned>(&self, request: &ApiRequest) -> ApiResult<ApiSuccess<T>> {
        if !request.requires_auth() {
            return self.execute(request, None).await;
        }

        let token = self.session.access_token();
        let original = match self.execute(request, token.as_deref()).await {
            Err(error) if error.is_unauthorized() => error,
            outcome => return outcome,
        };

        let Some(fresh_token) = self.refresh_access_token(token.as_deref()).await else {
            return Err(original);
        };

        debug!(path = %request.path(), "Retrying request with refreshed token");
        self.execute(request, Some(&fresh_token)).await
    }

    /// Sends `request` and returns its payload.
    pub async fn fetch<T: DeserializeOwned>(&self, request: &ApiRequest) -> ApiResult<T> {
        self.send(request).await?.into_data()
    }

    /// Obtains a usable access token after `stale` was rejected.
    ///
    /// Refreshes are single-flight: callers queue on `refresh_lock`, and a caller
    /// whose stale token has already been rotated by someone else reuses the
    /// new token instead of refreshing again. Any failure clears the session.
    async fn refresh_access_token(&self, stale: Option<&str>) -> Option<String> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(current) = self.session.access_token() {
            if stale != Some(current.as_str()) {
                debug!("Access token already rotated by a concurrent refresh");
                return Some(current);
            }
        }

        let Some(refresh_token) = self.session.refresh_token() else {
            warn!("No refresh token available, forcing logout");
            self.session.clear();
            return None;
        };

        let request = match ApiRequest::post(endpoints::REFRESH_TOKEN).json(&RefreshRequest {
            refresh_token: refresh_token.clone(),
        }) {
            Ok(request) => request,
            Err(error) => {
                warn!(error = %error, "Failed to build refresh request, forcing logout");
                self.session.clear();
                return None;
            }
        };

        let refreshed = match self
            .execute::<RefreshResponse>(&request, None)
            .await
            .and_then(ApiSuccess::into_data)
        {
            Ok(response) => response.into_pair(&refresh_token),
            Err(error) => {
                warn!(error = %error, "Token refresh failed, forcing logout");
                self.session.clear();
                return None;
            }
        };

        match self.session.rotate_tokens(&refreshed) {
            Ok(session) => {
                match session {
                    Some(session) => info!(user_id = %session.user.user_id, "Access token refreshed"),
                    None => info!("Access token refreshed"),
                }
                Some(refreshed.access_token)
            }
            Err(error) => {
                warn!(error = %error, "Failed to persist refreshed tokens, forcing logout");
                self.session.clear();
                None
            }
        }
    }

    /// One HTTP round-trip, no retry.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> ApiResult<ApiSuccess<T>> {
        let url = self
            .base_url
            .join(request.path.trim_start_matches('/'))
            .map_err(|e| ApiError::network(format!("invalid request URL: {e}")))?;

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(method = %request.method, path = %request.path, "Sending request");
        let response = builder.send().await.map_err(|e| {
            warn!(path = %request.path, error = %e, "Request failed without a response");
            ApiError::network(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::network(format!("failed to read response body: {e}")))?;

        decode_response(status, &body)
    }
}

/// Maps an HTTP status and body onto the success payload or an `ApiError`.
fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> ApiResult<ApiSuccess<T>> {
    let fallback_message = || {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    };

    let envelope: ApiEnvelope<serde_json::Value> = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(error) if status.is_success() => {
            return Err(ApiError::from_response(
                status.as_u16(),
                format!("Invalid response body: {error}"),
                None,
                Vec::new(),
            ));
        }
        Err(_) => {
            return Err(ApiError::from_response(
                status.as_u16(),
                fallback_message(),
                None,
                Vec::new(),
            ));
        }
    };

    if !status.is_success() || !envelope.success {
        let message = if envelope.message.is_empty() {
            fallback_message()
        } else {
            envelope.message
        };
        return Err(ApiError::from_response(
            status.as_u16(),
            message,
            envelope.code,
            envelope.errors.unwrap_or_default(),
        ));
    }

    let data = match envelope.data {
        None | Some(serde_json::Value::Null) => None,
        Some(value) => Some(serde_json::from_value(value).map_err(|e| {
            ApiError::from_response(
                status.as_u16(),
                format!("Unexpected response data: {e}"),
                None,
                Vec::new(),
            )
        })?),
    };

    Ok(ApiSuccess {
        message: envelope.message,
        data,
    })
}

/// `Url::join` replaces the last segment unless the base ends with `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
