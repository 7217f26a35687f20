//! Auth endpoints: signup, login, password reset, social login
//!
//! These only talk to the server. Storing the issued session is up to the
//! caller (see [`crate::session::SessionContext::begin`]).

use serde_json::json;

use super::client::{ApiClient, ApiError};
use crate::models::{
    ForgotPasswordResponse, LoginRequest, LoginResponse, MessageResponse, ResetPasswordRequest,
    Session, SignupRequest,
};

impl ApiClient {
    pub async fn signup(&self, req: &SignupRequest) -> Result<MessageResponse, ApiError> {
        self.post_json("/signup", req).await
    }

    /// Exchange username/password for a session
    pub async fn login(&self, req: &LoginRequest) -> Result<Session, ApiError> {
        let resp: LoginResponse = self.post_json("/login", req).await?;
        Ok(resp.into())
    }

    pub async fn forgot_password(&self, email: &str) -> Result<ForgotPasswordResponse, ApiError> {
        self.post_json("/forgot-password", &json!({ "email": email }))
            .await
    }

    pub async fn reset_password(
        &self,
        req: &ResetPasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.post_json("/reset-password", req).await
    }

    /// Exchange a provider ID token for a session
    pub async fn google_login(&self, credential: &str) -> Result<Session, ApiError> {
        let resp: LoginResponse = self
            .post_json("/google-login", &json!({ "credential": credential }))
            .await?;
        Ok(resp.into())
    }
}
