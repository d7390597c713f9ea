//! Core library for summeet - API client, auth token storage, models.
//!
//! ```no_run
//! use summeet_core::{ApiClient, Config, SummarizeOptions};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let client = ApiClient::new(&config, config.open_store()?)?;
//!
//! client.auth().login("a@b.com", "secret").await?;
//! let summary = client
//!     .transcriptions()
//!     .summarize(7, &SummarizeOptions::default())
//!     .await?;
//! println!("{}", summary.summary);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthEvent, FileStore, KeyringStore, MemoryStore, TokenManager, TokenStore};
pub use config::{Config, CredentialBackend};
pub use models::{
    DirectTranscript, ExportedFile, LoginResponse, ServiceStatus, SummarizeOptions,
    SummaryResponse, Transcription, TranscriptionId,
};
