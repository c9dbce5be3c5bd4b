//! Password recovery and profile endpoints.
//!
//! Login, registration, and token refresh live on
//! [`crate::session::Session`], which owns the credential store these
//! endpoints never touch.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use mercadito_core::{Email, UserId};

use crate::error::ApiError;
use crate::models::{Profile, ProfileUpdate};

use super::ApiClient;

/// Response of the password reset trigger endpoint.
#[derive(Debug, Deserialize)]
pub struct PasswordResetStarted {
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of the password change endpoint.
#[derive(Debug, Deserialize)]
pub struct PasswordChanged {
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiClient {
    /// Ask the server to email a one-time password for account recovery.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for unknown accounts, or an error if
    /// the API request fails.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn request_password_reset(
        &self,
        email: &Email,
    ) -> Result<PasswordResetStarted, ApiError> {
        self.get_json(&format!("user/password-reset/{email}/")).await
    }

    /// Set a new password using the OTP and uidb64 from the reset email.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a wrong or expired OTP, or an
    /// error if the API request fails.
    #[instrument(skip(self, password, otp))]
    pub async fn change_password(
        &self,
        password: &SecretString,
        otp: &str,
        uidb64: &str,
    ) -> Result<PasswordChanged, ApiError> {
        self.post_form(
            "user/password-change/",
            &[
                ("password", password.expose_secret().to_owned()),
                ("otp", otp.to_owned()),
                ("uidb64", uidb64.to_owned()),
            ],
        )
        .await
    }

    /// Fetch a user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn profile(&self, user_id: UserId) -> Result<Profile, ApiError> {
        self.get_json(&format!("user/profile/{user_id}/")).await
    }

    /// Update the logged-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::LoginRequired`] when anonymous, or an error if
    /// the API request fails.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        let identity = self.session().identity().ok_or(ApiError::LoginRequired)?;

        self.patch_json(&format!("user/profile/{}/", identity.user_id), update)
            .await
    }
}
