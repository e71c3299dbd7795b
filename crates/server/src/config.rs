//! Service configuration

use anyhow::Result;
use rec_lib::prompt::{DEFAULT_SYSTEM_PROMPT, DEFAULT_USER_TEMPLATE};
use serde::Deserialize;

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Port the HTTP API listens on
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Base URL of the Ollama backend
    #[serde(default = "default_ollama_host")]
    pub ollama_host: String,

    /// Model identifier passed to the backend
    #[serde(default = "default_model")]
    pub model: String,

    /// Timeout for each outbound chat call in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// System prompt; an empty string disables the system message
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// User-message template, see `rec_lib::prompt` for placeholders
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,
}

fn default_api_port() -> u16 {
    8080
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "gemma3:12b".to_string()
}

fn default_request_timeout() -> u64 {
    60
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_prompt_template() -> String {
    DEFAULT_USER_TEMPLATE.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            ollama_host: default_ollama_host(),
            model: default_model(),
            request_timeout_secs: default_request_timeout(),
            system_prompt: default_system_prompt(),
            prompt_template: default_prompt_template(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment (prefix `REC_`)
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("REC"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }

    /// System prompt as an option, treating the empty string as "none"
    pub fn system_prompt(&self) -> Option<String> {
        if self.system_prompt.is_empty() {
            None
        } else {
            Some(self.system_prompt.clone())
        }
    }
}
