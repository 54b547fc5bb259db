use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use easy_config_store::ConfigStore;
use eyre::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::extract::search::SearchSelectors;

pub const MODEL_ENV_VAR: &str = "LLM_MODEL_NAME";
pub const API_KEY_ENV_VAR: &str = "LLM_API_KEY";

pub type Config = Arc<ConfigInner>;

pub fn config(path: PathBuf) -> Result<Config> {
    let config_store = ConfigStore::<ConfigInner>::read(path, "config".to_string())?;
    let inner = (*config_store).clone();

    info!("config parsing successful");
    debug!("loaded configuration:\n{}", toml::to_string_pretty(&inner)?);

    Ok(Arc::new(inner))
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ConfigInner {
    pub llm: LLMConfig,
    pub browser: BrowserConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct LLMConfig {
    /// Overridden by `LLM_MODEL_NAME` when that is set.
    pub model: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl LLMConfig {
    /// Model id from `env`, then from the config file.
    pub fn resolve_model_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<String, ConfigError> {
        env(MODEL_ENV_VAR)
            .or_else(|| self.model.clone())
            .map(|model| model.trim().to_string())
            .filter(|model| !model.is_empty())
            .ok_or(ConfigError::MissingModel {
                var: MODEL_ENV_VAR,
            })
    }

    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV_VAR).ok())
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct BrowserConfig {
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    #[serde(default)]
    pub headless: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,
    #[serde(default = "default_ready_timeout_secs")]
    pub ready_timeout_secs: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Element that marks a profile's experience page as rendered.
    #[serde(default = "default_profile_ready_selector")]
    pub profile_ready_selector: String,
}

impl BrowserConfig {
    pub fn base_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.base_url)?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// How many polls fit in the readiness timeout, at least one.
    pub fn poll_attempts(&self) -> usize {
        let timeout_ms = self.ready_timeout_secs.saturating_mul(1000);
        (timeout_ms / self.poll_interval_ms.max(1)).max(1) as usize
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_results_container")]
    pub results_container: String,
    #[serde(default = "default_result_item")]
    pub result_item: String,
    #[serde(default = "default_profile_link")]
    pub profile_link: String,
    #[serde(default = "default_next_button")]
    pub next_button: String,
}

impl SearchConfig {
    pub fn selectors(&self) -> Result<SearchSelectors> {
        SearchSelectors::parse(
            &self.results_container,
            &self.result_item,
            &self.profile_link,
            &self.next_button,
        )
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            results_container: default_results_container(),
            result_item: default_result_item(),
            profile_link: default_profile_link(),
            next_button: default_next_button(),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_shortlisted_file")]
    pub shortlisted: PathBuf,
    #[serde(default = "default_rejected_file")]
    pub rejected: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            shortlisted: default_shortlisted_file(),
            rejected: default_rejected_file(),
        }
    }
}

fn default_llm_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    300
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_base_url() -> String {
    "https://www.linkedin.com".to_string()
}

fn default_session_file() -> PathBuf {
    PathBuf::from("auth.json")
}

fn default_ready_timeout_secs() -> u64 {
    20
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_profile_ready_selector() -> String {
    "main h1".to_string()
}

fn default_results_container() -> String {
    "div.search-results-container ul, ul.reusable-search__entity-result-list".to_string()
}

fn default_result_item() -> String {
    "li".to_string()
}

fn default_profile_link() -> String {
    "a[href*='/in/']".to_string()
}

fn default_next_button() -> String {
    "button[aria-label='Next']:not([disabled])".to_string()
}

fn default_shortlisted_file() -> PathBuf {
    PathBuf::from("shortlisted_candidates.txt")
}

fn default_rejected_file() -> PathBuf {
    PathBuf::from("rejected_candidates.txt")
}

impl Default for ConfigInner {
    fn default() -> Self {
        let cfg = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.default.toml",));

        toml::from_str(cfg).unwrap() // should be okay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let config = ConfigInner::default();

        assert_eq!(config.llm.temperature, 0.3);
        assert_eq!(config.llm.max_tokens, 300);
        assert_eq!(config.browser.session_file, PathBuf::from("auth.json"));
        assert_eq!(
            config.output.shortlisted,
            PathBuf::from("shortlisted_candidates.txt")
        );
        assert!(config.search.selectors().is_ok());
        assert!(config.browser.base_url().is_ok());
    }

    #[test]
    fn model_comes_from_env_before_file() {
        let mut llm = ConfigInner::default().llm;
        llm.model = Some("file-model".to_string());

        let from_env = llm.resolve_model_with(|var| {
            (var == MODEL_ENV_VAR).then(|| "env-model".to_string())
        });
        assert_eq!(from_env, Ok("env-model".to_string()));
        assert_eq!(llm.resolve_model_with(|_| None), Ok("file-model".to_string()));
    }

    #[test]
    fn missing_model_is_a_config_error() {
        let mut llm = ConfigInner::default().llm;
        llm.model = None;

        assert_eq!(
            llm.resolve_model_with(|_| None),
            Err(ConfigError::MissingModel {
                var: MODEL_ENV_VAR
            })
        );
        assert!(llm.resolve_model_with(|_| Some("  ".to_string())).is_err());
    }

    #[test]
    fn readiness_budget_covers_timeout() {
        let mut browser = ConfigInner::default().browser;
        browser.ready_timeout_secs = 6;
        browser.poll_interval_ms = 500;
        assert_eq!(browser.poll_attempts(), 12);

        browser.ready_timeout_secs = 0;
        assert_eq!(browser.poll_attempts(), 1);
    }
}
