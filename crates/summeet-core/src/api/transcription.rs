//! Transcription endpoints: upload, direct transcripts, fetch, summarize, export.

use std::path::Path;

use reqwest::{header, multipart, Method};
use tracing::debug;

use crate::models::{
    content_disposition_filename, DirectTranscript, ExportedFile, SummarizeOptions,
    SummaryResponse, Transcription, TranscriptionId,
};

use super::{ApiClient, ApiError};

/// Multipart field the backend reads the audio from
const UPLOAD_FIELD: &str = "file";

/// Name sent when an upload path has no file name component
const FALLBACK_UPLOAD_NAME: &str = "upload";

pub struct TranscriptionApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TranscriptionApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Upload an audio file from disk for transcription.
    pub async fn upload(&self, path: impl AsRef<Path>) -> Result<Transcription, ApiError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_UPLOAD_NAME.to_string());
        self.upload_bytes(file_name, bytes).await
    }

    /// Upload in-memory audio. The multipart body replaces the JSON content type.
    pub async fn upload_bytes(
        &self,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Transcription, ApiError> {
        let file_name = file_name.into();
        debug!(file_name = %file_name, size = bytes.len(), "Uploading audio");

        let part = multipart::Part::bytes(bytes).file_name(file_name);
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        self.client
            .send_json(self.client.request(Method::POST, "/upload").multipart(form))
            .await
    }

    /// Store a transcript typed or pasted by the user, skipping transcription.
    pub async fn save_direct_transcript(
        &self,
        transcript: &DirectTranscript,
    ) -> Result<Transcription, ApiError> {
        self.client
            .send_json(self.client.request(Method::POST, "/transcript").json(transcript))
            .await
    }

    pub async fn get(&self, id: impl Into<TranscriptionId>) -> Result<Transcription, ApiError> {
        let path = format!("/transcription/{}", id.into().path_segment());
        self.client
            .send_json(self.client.request(Method::GET, &path))
            .await
    }

    /// Ask the backend to summarize a stored transcription.
    /// Options travel as query parameters; the request has no body.
    pub async fn summarize(
        &self,
        id: impl Into<TranscriptionId>,
        options: &SummarizeOptions,
    ) -> Result<SummaryResponse, ApiError> {
        let path = format!("/summarize/{}", id.into().path_segment());
        self.client
            .send_json(self.client.request(Method::POST, &path).query(options))
            .await
    }

    /// Download the exported summary document as raw bytes.
    pub async fn export(&self, id: impl Into<TranscriptionId>) -> Result<ExportedFile, ApiError> {
        let path = format!("/export/{}", id.into().path_segment());
        let response = self
            .client
            .send(self.client.request(Method::GET, &path))
            .await?;

        let header_text = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header_text(header::CONTENT_TYPE);
        let filename = header_text(header::CONTENT_DISPOSITION)
            .and_then(|value| content_disposition_filename(&value));

        let bytes = response.bytes().await?.to_vec();
        debug!(size = bytes.len(), "Export downloaded");

        Ok(ExportedFile {
            bytes,
            content_type,
            filename,
        })
    }
}
