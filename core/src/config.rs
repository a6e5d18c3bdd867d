use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";
pub const HOME_ENV_VAR: &str = "TONESHIFT_HOME";
pub const MODEL_ENV_VAR: &str = "TONESHIFT_MODEL";
pub const BASE_URL_ENV_VAR: &str = "TONESHIFT_BASE_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "{API_KEY_ENV_VAR} is not set. Export an API key for the generation service before starting."
    )]
    MissingApiKey,
    #[error("could not determine a home directory; set {HOME_ENV_VAR} explicitly")]
    NoHomeDir,
}

/// Values resolved once at startup and passed down; nothing below this layer
/// touches the process environment.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding the custom tone record and log files.
    pub toneshift_home: PathBuf,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub toneshift_home: Option<PathBuf>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl Config {
    /// Missing credentials are a fatal startup condition: callers are expected
    /// to bail out before initialising the terminal.
    pub fn load(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let api_key = std::env::var(API_KEY_ENV_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty());
        let env = ConfigOverrides {
            toneshift_home: std::env::var(HOME_ENV_VAR).ok().map(PathBuf::from),
            model: std::env::var(MODEL_ENV_VAR).ok(),
            base_url: std::env::var(BASE_URL_ENV_VAR).ok(),
        };
        Self::from_parts(api_key, overrides, env)
    }

    /// CLI overrides win over environment variables, which win over defaults.
    fn from_parts(
        api_key: Option<String>,
        cli: ConfigOverrides,
        env: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let api_key = api_key.ok_or(ConfigError::MissingApiKey)?;
        let toneshift_home = match cli.toneshift_home.or(env.toneshift_home) {
            Some(home) => home,
            None => find_toneshift_home()?,
        };
        let model = cli
            .model
            .or(env.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = cli
            .base_url
            .or(env.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            toneshift_home,
            api_key,
            model,
            base_url,
        })
    }
}

fn find_toneshift_home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".toneshift"))
        .ok_or(ConfigError::NoHomeDir)
}
