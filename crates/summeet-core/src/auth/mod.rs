//! Authentication state for the summeet client.
//!
//! This module provides:
//! - `TokenStore`: pluggable key-value storage (memory, JSON file, OS keychain)
//! - `TokenManager`: access token and user email on top of a store
//! - `AuthEvent`: notifications broadcast when the server rejects the token
//!
//! Only two entries are ever persisted: the bearer token and the user email.

pub mod events;
pub mod file_store;
pub mod keyring_store;
pub mod store;
pub mod token;

pub use events::AuthEvent;
pub use file_store::FileStore;
pub use keyring_store::KeyringStore;
pub use store::{MemoryStore, TokenStore};
pub use token::{TokenManager, TOKEN_KEY, USER_EMAIL_KEY};
