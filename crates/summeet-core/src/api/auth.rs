use reqwest::Method;
use tracing::info;

use crate::models::{LoginRequest, LoginResponse};

use super::{ApiClient, ApiError};

/// Login, logout and the locally known session.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Authenticate and persist the returned token and email before
    /// handing the full response body back.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest { email, password };
        let response: LoginResponse = self
            .client
            .send_json(self.client.request(Method::POST, "/login").json(&body))
            .await?;

        let tokens = self.client.tokens();
        tokens.set_token(&response.access_token);
        tokens.set_user_email(&response.user_email);

        info!(user = %response.user_email, "Logged in");
        Ok(response)
    }

    /// Forget the local session. No request is sent.
    pub fn logout(&self) {
        self.client.tokens().clear_auth();
        info!("Logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.tokens().is_authenticated()
    }

    /// Email of the signed-in user, if any
    pub fn current_user(&self) -> Option<String> {
        self.client.tokens().user_email()
    }
}
