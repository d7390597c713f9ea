use std::sync::Arc;

use tracing::warn;

use super::TokenStore;

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "summeet_access_token";

/// Storage key for the signed-in user's email
pub const USER_EMAIL_KEY: &str = "summeet_user_email";

/// Access token and user email over a [`TokenStore`].
///
/// Storage failures never reach the caller: they are logged and a failed
/// read is treated as "nothing stored", which leaves the client
/// unauthenticated.
pub struct TokenManager {
    store: Arc<dyn TokenStore>,
}

impl TokenManager {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    pub fn token(&self) -> Option<String> {
        self.read(TOKEN_KEY)
    }

    pub fn set_token(&self, token: &str) {
        self.write(TOKEN_KEY, token);
    }

    pub fn remove_token(&self) {
        self.delete(TOKEN_KEY);
    }

    pub fn user_email(&self) -> Option<String> {
        self.read(USER_EMAIL_KEY)
    }

    pub fn set_user_email(&self, email: &str) {
        self.write(USER_EMAIL_KEY, email);
    }

    pub fn remove_user_email(&self) {
        self.delete(USER_EMAIL_KEY);
    }

    /// True iff a non-empty token is stored
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|token| !token.is_empty())
    }

    /// Forget both the token and the user email
    pub fn clear_auth(&self) {
        self.remove_token();
        self.remove_user_email();
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, "Failed to read credential store: {:#}", e);
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            warn!(key, "Failed to write credential store: {:#}", e);
        }
    }

    fn delete(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!(key, "Failed to remove from credential store: {:#}", e);
        }
    }
}
