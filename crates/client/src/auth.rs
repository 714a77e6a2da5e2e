//! Authentication flows on top of the session gateway.

use std::sync::Arc;

use lendwise_shared::auth::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse, LogoutRequest,
    ProfileUpdate, RegisterRequest, ResetPasswordRequest,
};
use lendwise_shared::{ApiError, ApiResult, Session, UserProfile, UserType};
use serde::Deserialize;
use tracing::{info, warn};

use crate::endpoints;
use crate::gateway::SessionGateway;
use crate::request::ApiRequest;

/// `/auth/me` and `/auth/profile` return either the profile or `{ user }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProfilePayload {
    Wrapped { user: UserProfile },
    Bare(UserProfile),
}

impl From<ProfilePayload> for UserProfile {
    fn from(payload: ProfilePayload) -> Self {
        match payload {
            ProfilePayload::Wrapped { user } | ProfilePayload::Bare(user) => user,
        }
    }
}

/// Login, logout and account management.
#[derive(Debug, Clone)]
pub struct AuthService {
    gateway: Arc<SessionGateway>,
}

impl AuthService {
    /// Creates a new auth service.
    #[must_use]
    pub fn new(gateway: Arc<SessionGateway>) -> Self {
        Self { gateway }
    }

    /// Logs in and persists the resulting session.
    ///
    /// # Errors
    ///
    /// Returns the backend's `ApiError` on rejected credentials, or a server
    /// error if the session cannot be persisted.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
        user_type: UserType,
    ) -> ApiResult<Session> {
        let request = ApiRequest::post(endpoints::LOGIN).json(&LoginRequest {
            identifier: identifier.to_string(),
            password: password.to_string(),
            user_type,
        })?;

        let response: LoginResponse = self.gateway.fetch(&request).await?;
        let session = Session::from(response);

        self.gateway
            .session()
            .establish(session.clone())
            .map_err(|e| ApiError::server(format!("failed to persist session: {e}")))?;

        info!(
            user_id = %session.user.user_id,
            user_type = %session.user.user_type,
            "User logged in"
        );
        Ok(session)
    }

    /// Logs out. The server call is best effort; local credentials are always
    /// cleared.
    pub async fn logout(&self) {
        let context = self.gateway.session();
        if let Some(refresh_token) = context.refresh_token() {
            let outcome = match ApiRequest::post(endpoints::LOGOUT)
                .authorized()
                .json(&LogoutRequest { refresh_token })
            {
                Ok(request) => self
                    .gateway
                    .send::<serde_json::Value>(&request)
                    .await
                    .map(|_| ()),
                Err(error) => Err(error),
            };
            if let Err(error) = outcome {
                warn!(error = %error, "Server logout failed, clearing local session anyway");
            }
        }

        context.clear();
        info!("User logged out");
    }

    /// Fetches the current user and refreshes the stored profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on request failure.
    pub async fn get_current_user(&self) -> ApiResult<UserProfile> {
        let request = ApiRequest::get(endpoints::CURRENT_USER).authorized();
        let user: UserProfile = self.gateway.fetch::<ProfilePayload>(&request).await?.into();
        self.store_user(&user);
        Ok(user)
    }

    /// Changes the password of the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on request failure.
    pub async fn change_password(&self, old_password: &str, new_password: &str) -> ApiResult<()> {
        let request = ApiRequest::post(endpoints::CHANGE_PASSWORD)
            .authorized()
            .json(&ChangePasswordRequest {
                old_password: old_password.to_string(),
                new_password: new_password.to_string(),
            })?;
        self.gateway.send::<serde_json::Value>(&request).await?;
        info!("Password changed");
        Ok(())
    }

    /// Updates profile fields and persists the profile the backend returns.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `update` changes nothing, otherwise
    /// `ApiError` on request failure.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<UserProfile> {
        if update.is_empty() {
            return Err(ApiError::validation("profile", "No fields to update"));
        }

        let request = ApiRequest::put(endpoints::PROFILE).authorized().json(update)?;
        let user: UserProfile = self.gateway.fetch::<ProfilePayload>(&request).await?.into();
        self.store_user(&user);
        Ok(user)
    }

    /// Registers a new customer account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on request failure.
    pub async fn register(&self, registration: &RegisterRequest) -> ApiResult<String> {
        let request = ApiRequest::post(endpoints::REGISTER).json(registration)?;
        let success = self.gateway.send::<serde_json::Value>(&request).await?;
        Ok(success.message)
    }

    /// Requests a password reset link.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on request failure.
    pub async fn forgot_password(&self, email: &str) -> ApiResult<String> {
        let request = ApiRequest::post(endpoints::FORGOT_PASSWORD).json(&ForgotPasswordRequest {
            email: email.to_string(),
        })?;
        let success = self.gateway.send::<serde_json::Value>(&request).await?;
        Ok(success.message)
    }

    /// Sets a new password using a reset token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on request failure.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> ApiResult<String> {
        let request = ApiRequest::post(endpoints::RESET_PASSWORD).json(&ResetPasswordRequest {
            token: token.to_string(),
            new_password: new_password.to_string(),
        })?;
        let success = self.gateway.send::<serde_json::Value>(&request).await?;
        Ok(success.message)
    }

    fn store_user(&self, user: &UserProfile) {
        if let Err(error) = self.gateway.session().update_user(user) {
            warn!(error = %error, "Failed to persist user profile");
        }
    }
}
