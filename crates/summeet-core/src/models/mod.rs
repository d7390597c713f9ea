//! Wire models for the summeet API.
//!
//! - `Transcription`, `TranscriptionId`: stored transcripts and their ids
//! - `DirectTranscript`, `SummarizeOptions`: request shapes with their defaults
//! - `SummaryResponse`, `ExportedFile`: summary text and raw export payloads
//! - `LoginResponse`, `ServiceStatus`: auth and health answers

pub mod auth;
pub mod transcription;

pub(crate) use auth::LoginRequest;
pub use auth::{LoginResponse, ServiceStatus};
pub(crate) use transcription::content_disposition_filename;
pub use transcription::{
    DirectTranscript, ExportedFile, SummarizeOptions, SummaryResponse, Transcription,
    TranscriptionId, DEFAULT_SPEAKERS, DEFAULT_SUMMARY_LANGUAGE, DEFAULT_SUMMARY_TEMPERATURE,
};
