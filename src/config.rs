use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration, sourced from environment variables with the
/// defaults the assistant shipped with. Loaded once at startup and handed
/// to the driver by value.
#[derive(Debug, Clone)]
pub struct Config {
    /// How long a single listen waits for speech to start.
    pub listen_timeout: Duration,
    /// Upper bound on the length of one captured phrase.
    pub phrase_time_limit: Duration,
    /// Whether the voice loop should be wake-word gated.
    pub wake_word_enabled: bool,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    /// Append-only command log destination.
    pub command_log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_timeout: Duration::from_secs(6),
            phrase_time_limit: Duration::from_secs(8),
            wake_word_enabled: true,
            gemini_api_key: None,
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            command_log_path: PathBuf::from("jarvo_command_log.txt"),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            listen_timeout: env_secs("LISTENING_TIMEOUT").unwrap_or(defaults.listen_timeout),
            phrase_time_limit: env_secs("PHRASE_TIME_LIMIT").unwrap_or(defaults.phrase_time_limit),
            wake_word_enabled: env::var("WAKE_WORD_ENABLED")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.wake_word_enabled),
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_base_url: env::var("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            command_log_path: env::var("COMMAND_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.command_log_path),
        }
    }
}

fn env_secs(key: &str) -> Option<Duration> {
    env::var(key).ok()?.parse::<u64>().ok().map(Duration::from_secs)
}
