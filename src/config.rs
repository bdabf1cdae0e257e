use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::clients::openai::{
    DEFAULT_API_BASE, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_MS,
};
use crate::error::{MindMeshError, Result};

/// Main configuration structure loaded from mindmesh.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub completion: CompletionConfig,
    pub session: SessionConfig,
    pub journal: JournalConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Chat completion endpoint and sampling parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub api_base: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Per-request HTTP timeout
    pub timeout_ms: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Whether the follow-up role waits for the action plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpMode {
    /// Follow-up depends on the assessment only and runs alongside the action plan.
    #[default]
    Concurrent,
    /// Follow-up runs after the action plan and embeds its text.
    Chained,
}

impl FromStr for FollowUpMode {
    type Err = MindMeshError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "concurrent" => Ok(FollowUpMode::Concurrent),
            "chained" => Ok(FollowUpMode::Chained),
            other => Err(MindMeshError::Config {
                message: format!(
                    "unknown follow-up mode '{}' (expected concurrent or chained)",
                    other
                ),
            }),
        }
    }
}

impl fmt::Display for FollowUpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FollowUpMode::Concurrent => f.write_str("concurrent"),
            FollowUpMode::Chained => f.write_str("chained"),
        }
    }
}

/// Orchestration behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    pub follow_up_mode: FollowUpMode,
    /// Upper bound on a single completion call, on top of the HTTP timeout.
    /// `None` waits indefinitely.
    pub call_timeout_ms: Option<u64>,
    /// Worker threads for the blocking entry point
    pub worker_threads: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            follow_up_mode: FollowUpMode::Concurrent,
            call_timeout_ms: None,
            worker_threads: 2,
        }
    }
}

/// Where journal entries are persisted
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JournalConfig {
    pub data_dir: PathBuf,
    pub file_name: String,
    /// How many past entries `journal list` shows by default
    pub recent_limit: usize,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .map(|d| d.join("mindmesh"))
                .unwrap_or_else(|| PathBuf::from("data")),
            file_name: "journal.json".to_string(),
            recent_limit: 20,
        }
    }
}

const DEFAULT_LOG_FILTER: &str = "mindmesh=info";

/// `RUST_LOG`, or `mindmesh=info` when unset or blank.
pub fn log_filter_from<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("RUST_LOG")
        .filter(|filter| !filter.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

/// Load environment variables with smart fallbacks:
/// 1) MINDMESH_ENV_FILE if set
/// 2) ./.env
/// 3) ../.env when the API key is still missing
///
/// Existing variables are never overwritten, so calling this twice is harmless.
pub fn load_dotenv() {
    if let Ok(env_path) = std::env::var("MINDMESH_ENV_FILE") {
        let _ = dotenvy::from_path(env_path);
    } else {
        let _ = dotenvy::from_path(".env");
        if std::env::var("OPENAI_API_KEY").is_err() {
            let _ = dotenvy::from_path("../.env");
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub openai_api_key: Option<String>,
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            log_level: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn load_from<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            openai_api_key: lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
            log_level: log_filter_from(&lookup),
        }
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses MINDMESH_CONFIG environment variable or defaults to "mindmesh.toml"
    pub fn load() -> Result<Self> {
        load_dotenv();

        let config_path =
            std::env::var("MINDMESH_CONFIG").unwrap_or_else(|_| "mindmesh.toml".to_string());

        let mut config = Self::from_file_or_default(Path::new(&config_path))?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file_or_default(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(_) => {
                tracing::warn!("Config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Env-first overrides. `lookup` is `std::env::var` outside of tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup("MINDMESH_API_BASE") {
            self.completion.api_base = base;
        }
        if let Some(model) = lookup("MINDMESH_MODEL") {
            self.completion.model = model;
        }
        if let Some(max_tokens) = parsed(&lookup, "MINDMESH_MAX_TOKENS") {
            self.completion.max_tokens = max_tokens;
        }
        if let Some(temperature) = parsed(&lookup, "MINDMESH_TEMPERATURE") {
            self.completion.temperature = temperature;
        }
        if let Some(timeout) = parsed(&lookup, "MINDMESH_TIMEOUT_MS") {
            self.completion.timeout_ms = timeout;
        }
        if let Some(mode) = parsed(&lookup, "MINDMESH_FOLLOW_UP_MODE") {
            self.session.follow_up_mode = mode;
        }
        if let Some(ms) = parsed::<u64, _>(&lookup, "MINDMESH_CALL_TIMEOUT_MS") {
            // 0 disables the per-call bound
            self.session.call_timeout_ms = (ms > 0).then_some(ms);
        }
        if let Some(dir) = lookup("MINDMESH_DATA_DIR") {
            self.journal.data_dir = PathBuf::from(dir);
        }

        self.runtime = RuntimeConfig::load_from(lookup);
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let fail = |message: &str| {
            Err(MindMeshError::Config {
                message: message.to_string(),
            })
        };

        if self.completion.model.trim().is_empty() {
            return fail("completion.model must not be empty");
        }
        if self.completion.max_tokens == 0 {
            return fail("completion.max_tokens must be > 0");
        }
        if !(0.0..=2.0).contains(&self.completion.temperature) {
            return fail("completion.temperature must be between 0.0 and 2.0");
        }
        if self.session.worker_threads < 2 {
            return fail("session.worker_threads must be at least 2");
        }
        if self.journal.file_name.trim().is_empty() {
            return fail("journal.file_name must not be empty");
        }
        Ok(())
    }

    pub fn journal_path(&self) -> PathBuf {
        self.journal.data_dir.join(&self.journal.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_completion_contract() {
        let config = Config::default();
        assert_eq!(config.completion.model, "gpt-4o-mini");
        assert_eq!(config.completion.max_tokens, 500);
        assert_eq!(config.completion.temperature, 0.7);
        assert_eq!(config.session.follow_up_mode, FollowUpMode::Concurrent);
        assert!(config.session.call_timeout_ms.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [completion]
            model = "gpt-4o"

            [session]
            follow_up_mode = "chained"
            call_timeout_ms = 45000
            "#,
        )
        .unwrap();
        assert_eq!(config.completion.model, "gpt-4o");
        assert_eq!(config.completion.max_tokens, 500);
        assert_eq!(config.session.follow_up_mode, FollowUpMode::Chained);
        assert_eq!(config.session.call_timeout_ms, Some(45_000));
        assert_eq!(config.journal.file_name, "journal.json");
    }

    #[test]
    fn env_overrides_win() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("MINDMESH_MODEL", "local-model"),
            ("MINDMESH_TEMPERATURE", "0.2"),
            ("MINDMESH_FOLLOW_UP_MODE", "Chained"),
            ("MINDMESH_CALL_TIMEOUT_MS", "1500"),
            ("MINDMESH_DATA_DIR", "/tmp/mm"),
        ]));
        assert_eq!(config.runtime.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.completion.model, "local-model");
        assert_eq!(config.completion.temperature, 0.2);
        assert_eq!(config.session.follow_up_mode, FollowUpMode::Chained);
        assert_eq!(config.session.call_timeout_ms, Some(1500));
        assert_eq!(config.journal_path(), PathBuf::from("/tmp/mm/journal.json"));
    }

    #[test]
    fn bad_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("MINDMESH_MAX_TOKENS", "lots"),
            ("MINDMESH_FOLLOW_UP_MODE", "sideways"),
            ("MINDMESH_CALL_TIMEOUT_MS", "0"),
        ]));
        assert_eq!(config.completion.max_tokens, 500);
        assert_eq!(config.session.follow_up_mode, FollowUpMode::Concurrent);
        assert!(config.session.call_timeout_ms.is_none());
    }

    #[test]
    fn missing_api_key_is_not_an_error() {
        let mut config = Config::default();
        config.apply_env(env(&[("OPENAI_API_KEY", "")]));
        assert!(config.runtime.openai_api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn log_filter_defaults_without_config() {
        assert_eq!(log_filter_from(&env(&[])), "mindmesh=info");
        assert_eq!(log_filter_from(&env(&[("RUST_LOG", "  ")])), "mindmesh=info");
        assert_eq!(
            log_filter_from(&env(&[("RUST_LOG", "mindmesh=debug")])),
            "mindmesh=debug"
        );
    }

    #[test]
    fn runtime_log_level_matches_pre_load_filter() {
        let lookup = env(&[("RUST_LOG", "mindmesh=trace")]);
        let filter = log_filter_from(&lookup);
        assert_eq!(RuntimeConfig::load_from(lookup).log_level, filter);
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        let mut config = Config::default();
        config.completion.temperature = 3.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.session.worker_threads = 1;
        assert!(config.validate().is_err());
    }
}
