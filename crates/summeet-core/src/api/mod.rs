//! REST API client module for the summeet backend.
//!
//! This module provides the `ApiClient` and the call groups hanging off it:
//! `TranscriptionApi` (upload, transcripts, summaries, export), `AuthApi`
//! (login/logout) and `AppApi` (status probe).
//!
//! Requests carry a JWT bearer token obtained from `/login`. A 401 from
//! any endpoint clears the stored token and broadcasts `AuthEvent::Expired`.

pub mod app;
pub mod auth;
pub mod client;
pub mod error;
pub mod transcription;

pub use app::AppApi;
pub use auth::AuthApi;
pub use client::ApiClient;
pub use error::ApiError;
pub use transcription::TranscriptionApi;
