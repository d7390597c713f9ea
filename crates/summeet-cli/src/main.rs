//! summeet - command-line client for the meeting summarizer API.
//!
//! Thin front end over `summeet-core`: every subcommand except `config`
//! maps to one client operation and prints the response body.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use summeet_core::models::{DEFAULT_SPEAKERS, DEFAULT_SUMMARY_LANGUAGE, DEFAULT_SUMMARY_TEMPERATURE};
use summeet_core::{
    ApiClient, AuthEvent, Config, CredentialBackend, DirectTranscript, SummarizeOptions,
};

#[derive(Debug, Parser)]
#[command(name = "summeet", version, about = "Transcribe and summarize meetings")]
struct Cli {
    /// API base URL, absolute or relative to the configured origin
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that the API is reachable
    Status,
    /// Sign in and remember the session
    Login {
        email: String,
        /// Prompted for when omitted
        #[arg(long, env = "SUMMEET_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Upload an audio file for transcription
    Upload { file: PathBuf },
    /// Save a transcript from a text file without uploading audio
    Transcript {
        /// Name to store the transcript under
        filename: String,
        /// Text file holding the transcript
        transcript_file: PathBuf,
        /// Speaker table as a JSON string
        #[arg(long, default_value = DEFAULT_SPEAKERS)]
        speakers: String,
    },
    /// Fetch a stored transcription
    Get { id: String },
    /// Generate a summary for a transcription
    Summarize {
        id: String,
        #[arg(long, default_value = DEFAULT_SUMMARY_LANGUAGE)]
        language: String,
        #[arg(long, default_value_t = DEFAULT_SUMMARY_TEMPERATURE)]
        temperature: f64,
    },
    /// Download the exported summary document
    Export {
        id: String,
        /// Destination path; defaults to the server-suggested file name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show or change saved settings; `--api-base-url` is saved too
    Config {
        /// Origin a relative base URL is resolved against
        #[arg(long, value_name = "URL")]
        origin: Option<String>,
        /// Where the session is kept: file, keyring or memory
        #[arg(long, value_name = "BACKEND")]
        credential_store: Option<CredentialBackend>,
        /// Request timeout in seconds; 0 restores the transport default
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,
    },
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing();

    if let Command::Config { .. } = cli.command {
        return configure(ConfigChanges::from_cli(cli));
    }

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(base) = cli.api_base_url {
        config.api_base_url = base;
    }

    let store = config
        .open_store()
        .context("Failed to open credential store")?;
    let client = ApiClient::new(&config, store)?;
    info!(base_url = client.base_url(), "summeet starting");

    let mut auth_events = client.subscribe();
    let result = run(&client, cli.command).await;

    if result.is_err() && auth_events.try_recv() == Ok(AuthEvent::Expired) {
        eprintln!("Session expired. Run `summeet login <email>` to sign in again.");
    }
    result
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
    match command {
        Command::Status => print_json(&client.app().status().await?),
        Command::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => rpassword::prompt_password("Password: ")
                    .context("Failed to read password")?,
            };
            let resp = client.auth().login(&email, &password).await?;
            eprintln!("Logged in as {}", resp.user_email);
            Ok(())
        }
        Command::Logout => {
            client.auth().logout();
            eprintln!("Logged out");
            Ok(())
        }
        Command::Whoami => {
            match client.auth().current_user() {
                Some(email) if client.auth().is_authenticated() => println!("{}", email),
                _ => anyhow::bail!("Not logged in"),
            }
            Ok(())
        }
        Command::Upload { file } => print_json(&client.transcriptions().upload(&file).await?),
        Command::Transcript {
            filename,
            transcript_file,
            speakers,
        } => {
            let transcript = std::fs::read_to_string(&transcript_file).with_context(|| {
                format!("Failed to read transcript from {}", transcript_file.display())
            })?;
            let request = DirectTranscript::new(filename, transcript).with_speakers(speakers);
            print_json(&client.transcriptions().save_direct_transcript(&request).await?)
        }
        Command::Get { id } => print_json(&client.transcriptions().get(id).await?),
        Command::Summarize {
            id,
            language,
            temperature,
        } => {
            let options = SummarizeOptions::default()
                .with_language(language)
                .with_temperature(temperature);
            print_json(&client.transcriptions().summarize(id, &options).await?)
        }
        Command::Config { .. } => unreachable!("handled before the client is built"),
        Command::Export { id, output } => {
            let file = client.transcriptions().export(id.as_str()).await?;
            let path = output
                .or_else(|| file.filename.as_deref().map(safe_file_name))
                .unwrap_or_else(|| PathBuf::from(format!("meeting_{}_summary.md", id)));
            std::fs::write(&path, &file.bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Saved {} bytes to {}", file.bytes.len(), path.display());
            Ok(())
        }
    }
}

/// Settings passed to `summeet config`
#[derive(Debug, Default)]
struct ConfigChanges {
    api_base_url: Option<String>,
    origin: Option<String>,
    credential_store: Option<CredentialBackend>,
    timeout_secs: Option<u64>,
}

impl ConfigChanges {
    fn from_cli(cli: Cli) -> Self {
        match cli.command {
            Command::Config {
                origin,
                credential_store,
                timeout_secs,
            } => Self {
                api_base_url: cli.api_base_url,
                origin,
                credential_store,
                timeout_secs,
            },
            _ => Self::default(),
        }
    }

    fn is_empty(&self) -> bool {
        self.api_base_url.is_none()
            && self.origin.is_none()
            && self.credential_store.is_none()
            && self.timeout_secs.is_none()
    }

    fn apply(self, config: &mut Config) {
        if let Some(base) = self.api_base_url {
            config.api_base_url = base;
        }
        if let Some(origin) = self.origin {
            config.origin = origin;
        }
        if let Some(backend) = self.credential_store {
            config.credential_store = backend;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = (secs > 0).then_some(secs);
        }
    }
}

/// Print the stored settings, or update and save them.
fn configure(changes: ConfigChanges) -> Result<()> {
    // Stored values only, so environment overrides never get persisted
    let mut config = Config::load_stored().context("Failed to load configuration")?;
    if changes.is_empty() {
        return print_json(&config);
    }
    changes.apply(&mut config);
    let path = config.save()?;
    eprintln!("Saved settings to {}", path.display());
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let value: Value = serde_json::to_value(value)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Keep only the final component of a server-suggested name so a download
/// never lands outside the working directory.
fn safe_file_name(name: &str) -> PathBuf {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    match base {
        "" | "." | ".." => PathBuf::from("summary.md"),
        base => PathBuf::from(base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_summarize_defaults() {
        let cli = Cli::try_parse_from(["summeet", "summarize", "7"]).unwrap();
        match cli.command {
            Command::Summarize {
                id,
                language,
                temperature,
            } => {
                assert_eq!(id, "7");
                assert_eq!(language, "en");
                assert_eq!(temperature, 0.8);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_transcript_speakers_default_to_empty_list_string() {
        let cli =
            Cli::try_parse_from(["summeet", "transcript", "notes", "notes.txt"]).unwrap();
        match cli.command {
            Command::Transcript { speakers, .. } => assert_eq!(speakers, "[]"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_config_changes_update_only_given_fields() {
        let cli = Cli::try_parse_from([
            "summeet",
            "config",
            "--api-base-url",
            "https://summeet.example.com/api",
            "--credential-store",
            "keyring",
            "--timeout-secs",
            "0",
        ])
        .unwrap();
        let changes = ConfigChanges::from_cli(cli);
        assert!(!changes.is_empty());

        let mut config = Config {
            timeout_secs: Some(30),
            ..Config::default()
        };
        changes.apply(&mut config);
        assert_eq!(config.api_base_url, "https://summeet.example.com/api");
        assert_eq!(config.origin, Config::default().origin);
        assert_eq!(config.credential_store, CredentialBackend::Keyring);
        assert_eq!(config.timeout_secs, None);

        let bare = Cli::try_parse_from(["summeet", "config"]).unwrap();
        assert!(ConfigChanges::from_cli(bare).is_empty());
    }

    #[test]
    fn test_config_rejects_unknown_credential_store() {
        let err = Cli::try_parse_from(["summeet", "config", "--credential-store", "floppy"])
            .unwrap_err();
        assert!(err.to_string().contains("unknown credential store"));
    }

    #[test]
    fn test_safe_file_name_strips_directories() {
        assert_eq!(safe_file_name("standup_summary.md"), PathBuf::from("standup_summary.md"));
        assert_eq!(safe_file_name("../../etc/passwd"), PathBuf::from("passwd"));
        assert_eq!(safe_file_name("dir\\x.md"), PathBuf::from("x.md"));
        assert_eq!(safe_file_name(".."), PathBuf::from("summary.md"));
    }
}
