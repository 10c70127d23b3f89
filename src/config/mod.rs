use anyhow::{Context, Result};
use std::env;
use std::path::Path;

/// SiliconFlow OpenAI-compatible API root.
pub const DEFAULT_BASE_URL: &str = "https://api.siliconflow.cn/v1";

/// Speech-recognition model identifier.
pub const DEFAULT_ASR_MODEL: &str = "FunAudioLLM/SenseVoiceSmall";

/// Text-generation model identifier.
pub const DEFAULT_LLM_MODEL: &str = "Qwen/Qwen2.5-72B-Instruct";

/// Environment file expected next to the project root.
const ENV_FILE: &str = ".env.local";

const API_KEY_VAR: &str = "SILICONFLOW_API_KEY";
const BASE_URL_VAR: &str = "SILICONFLOW_BASE_URL";
const ASR_MODEL_VAR: &str = "SILICONFLOW_ASR_MODEL";
const LLM_MODEL_VAR: &str = "SILICONFLOW_LLM_MODEL";

/// Validated endpoint configuration, built once at startup and passed into
/// the transcriber and generator constructors.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the remote inference endpoints
    pub api_key: String,

    /// API root shared by both endpoints
    pub base_url: String,

    /// Speech-recognition model
    pub asr_model: String,

    /// Text-generation model
    pub llm_model: String,
}

impl Config {
    /// Load configuration from `.env.local` and the process environment.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(ENV_FILE))
    }

    /// Load configuration with an explicit environment file location.
    pub fn load_from(env_file: &Path) -> Result<Self> {
        if env_file.exists() {
            dotenvy::from_path(env_file)
                .with_context(|| format!("Failed to read {}", env_file.display()))?;
        }

        let api_key = env::var(API_KEY_VAR).unwrap_or_default();

        let config = Self {
            api_key,
            base_url: env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            asr_model: env::var(ASR_MODEL_VAR).unwrap_or_else(|_| DEFAULT_ASR_MODEL.to_string()),
            llm_model: env::var(LLM_MODEL_VAR).unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
        };

        config.validate()?;

        tracing::debug!(
            base_url = %config.base_url,
            asr_model = %config.asr_model,
            llm_model = %config.llm_model,
            "configuration loaded"
        );

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            anyhow::bail!(
                "{} is not set. Create a {} file at the project root containing the key, or export the variable.",
                API_KEY_VAR,
                ENV_FILE
            );
        }

        if self.base_url.is_empty() {
            anyhow::bail!("{} must not be empty", BASE_URL_VAR);
        }

        Ok(())
    }
}
