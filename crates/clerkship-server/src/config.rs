use std::env;
use std::path::PathBuf;

use jiff::SignedDuration;

/// Where learner documents are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    S3,
    /// Process memory. Answers are lost when the process exits.
    Memory,
}

/// Server settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub store: StoreBackend,
    pub bucket: String,
    pub collection: String,
    pub case_dir: PathBuf,
    pub bind: String,
    pub history_cap: SignedDuration,
    /// How long an untouched session is kept before it is dropped.
    pub session_idle: SignedDuration,
    /// Serve through the Lambda runtime instead of a local listener.
    pub lambda: bool,
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let store = match get("CLERKSHIP_STORE").as_deref().map(str::trim) {
            None | Some("") | Some("s3") => StoreBackend::S3,
            Some("memory") => StoreBackend::Memory,
            Some(other) => eyre::bail!("CLERKSHIP_STORE must be 's3' or 'memory', got '{other}'"),
        };
        let minutes = |key: &str, default: u32| -> eyre::Result<SignedDuration> {
            let minutes = match get(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| eyre::eyre!("{key} '{raw}': {e}"))?,
                None => default,
            };
            Ok(SignedDuration::from_mins(i64::from(minutes)))
        };

        Ok(Self {
            store,
            bucket: get("CLERKSHIP_BUCKET").unwrap_or_else(|| "clerkship".to_string()),
            collection: get("CLERKSHIP_COLLECTION").unwrap_or_else(|| "responses".to_string()),
            case_dir: get("CLERKSHIP_CASE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("case")),
            bind: get("CLERKSHIP_BIND").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            history_cap: minutes("CLERKSHIP_HISTORY_MINUTES", 15)?,
            session_idle: minutes("CLERKSHIP_SESSION_IDLE_MINUTES", 60)?,
            lambda: get("AWS_LAMBDA_RUNTIME_API").is_some(),
        })
    }
}
