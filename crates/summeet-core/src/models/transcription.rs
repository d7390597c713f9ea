//! Transcription records and the request shapes that produce them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Speaker table sent when the caller has none. The backend stores speakers
/// as a JSON string, so this is the literal text `[]`, not an empty array.
pub const DEFAULT_SPEAKERS: &str = "[]";

pub const DEFAULT_SUMMARY_LANGUAGE: &str = "en";

pub const DEFAULT_SUMMARY_TEMPERATURE: f64 = 0.8;

/// Server-assigned transcription identifier.
///
/// The backend hands out integers, but ids coming from user input or URLs
/// are accepted as strings and forwarded untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(untagged)]
pub enum TranscriptionId {
    Number(i64),
    Text(String),
}

impl TranscriptionId {
    /// The id as a single percent-encoded URL path segment.
    pub(crate) fn path_segment(&self) -> String {
        urlencoding::encode(&self.to_string()).into_owned()
    }
}

impl fmt::Display for TranscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptionId::Number(n) => write!(f, "{}", n),
            TranscriptionId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TranscriptionId {
    fn from(id: i64) -> Self {
        TranscriptionId::Number(id)
    }
}

impl From<i32> for TranscriptionId {
    fn from(id: i32) -> Self {
        TranscriptionId::Number(i64::from(id))
    }
}

impl From<&str> for TranscriptionId {
    fn from(id: &str) -> Self {
        TranscriptionId::Text(id.to_string())
    }
}

impl From<String> for TranscriptionId {
    fn from(id: String) -> Self {
        TranscriptionId::Text(id)
    }
}

impl From<&TranscriptionId> for TranscriptionId {
    fn from(id: &TranscriptionId) -> Self {
        id.clone()
    }
}

impl FromStr for TranscriptionId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(TranscriptionId::Number)
            .unwrap_or_else(|_| TranscriptionId::Text(s.to_string())))
    }
}

/// A transcription as returned by the server.
///
/// Every known field is optional and unknown fields land in `extra`, so a
/// record always round-trips to the caller exactly as the server sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Transcription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TranscriptionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    /// JSON-encoded speaker table, e.g. `[{"speaker": "A", "description": "host"}]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speakers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "ts", ts(skip))]
    pub extra: Map<String, Value>,
}

impl Transcription {
    /// Creation time, if the server sent one in a recognizable format.
    ///
    /// The backend emits naive ISO-8601 timestamps; offset-carrying RFC 3339
    /// values are accepted too and reduced to their UTC wall time.
    pub fn created_at_parsed(&self) -> Option<NaiveDateTime> {
        let raw = self.created_at.as_deref()?;
        raw.parse::<NaiveDateTime>()
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
    }

    /// Decoded speaker table; `None` when absent or not valid JSON.
    pub fn speakers_json(&self) -> Option<Value> {
        serde_json::from_str(self.speakers.as_deref()?).ok()
    }
}

/// Body of a transcript saved without an audio upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DirectTranscript {
    pub filename: String,
    pub transcript: String,
    pub speakers: String,
}

impl DirectTranscript {
    pub fn new(filename: impl Into<String>, transcript: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            transcript: transcript.into(),
            speakers: DEFAULT_SPEAKERS.to_string(),
        }
    }

    pub fn with_speakers(mut self, speakers: impl Into<String>) -> Self {
        self.speakers = speakers.into();
        self
    }
}

/// Query parameters for a summary request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SummarizeOptions {
    pub language: String,
    pub temperature: f64,
}

impl Default for SummarizeOptions {
    fn default() -> Self {
        Self {
            language: DEFAULT_SUMMARY_LANGUAGE.to_string(),
            temperature: DEFAULT_SUMMARY_TEMPERATURE,
        }
    }
}

impl SummarizeOptions {
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SummaryResponse {
    pub summary: String,
    #[serde(flatten)]
    #[cfg_attr(feature = "ts", ts(skip))]
    pub extra: Map<String, Value>,
}

/// Raw export payload. The bytes are handed over exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    /// Suggested file name from `Content-Disposition`
    pub filename: Option<String>,
}

/// Extract the file name from a `Content-Disposition` header value.
/// `filename*` (RFC 5987) wins over plain `filename` when both are present.
pub(crate) fn content_disposition_filename(value: &str) -> Option<String> {
    let mut plain = None;
    for param in value.split(';').map(str::trim) {
        let Some((name, raw)) = param.split_once('=') else {
            continue;
        };
        match name.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                // charset'language'percent-encoded-value
                let encoded = raw.trim().rsplit('\'').next().unwrap_or_default();
                if let Ok(decoded) = urlencoding::decode(encoded) {
                    if !decoded.is_empty() {
                        return Some(decoded.into_owned());
                    }
                }
            }
            "filename" => {
                let name = raw.trim().trim_matches('"');
                if !name.is_empty() {
                    plain = Some(name.to_string());
                }
            }
            _ => {}
        }
    }
    plain
}
