use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Model used when `GROQ_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Groq's OpenAI-compatible API root.
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct TafsirConfig {
    pub common: core_config::Config,
    pub llm: LlmConfig,
    pub dataset: DatasetConfig,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Secret<String>,
    /// Model identifier sent with every completion request
    pub model: String,
    pub base_url: String,
    /// Upper bound on a single completion call
    pub timeout: Duration,
}

/// Location and shape of the verse CSV.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub path: PathBuf,
    pub key_column: String,
    pub text_column: String,
}

impl TafsirConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        Self::from_source(common_config, |key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_source<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = get_var(&lookup, "GROQ_API_KEY", None)?;
        let timeout_secs = get_var(
            &lookup,
            "GROQ_TIMEOUT_SECS",
            Some(&DEFAULT_TIMEOUT_SECS.to_string()),
        )?;
        let timeout_secs: u64 = timeout_secs.parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "GROQ_TIMEOUT_SECS must be a whole number of seconds, got '{}': {}",
                timeout_secs,
                e
            ))
        })?;
        if timeout_secs == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "GROQ_TIMEOUT_SECS must be greater than zero"
            )));
        }

        Ok(TafsirConfig {
            common,
            llm: LlmConfig {
                api_key: Secret::new(api_key),
                model: get_var(&lookup, "GROQ_MODEL", Some(DEFAULT_MODEL))?,
                base_url: get_var(&lookup, "GROQ_API_BASE", Some(DEFAULT_API_BASE))?,
                timeout: Duration::from_secs(timeout_secs),
            },
            dataset: DatasetConfig {
                path: PathBuf::from(get_var(
                    &lookup,
                    "QURAN_DATASET_PATH",
                    Some("quran_arabic.csv"),
                )?),
                key_column: get_var(&lookup, "QURAN_KEY_COLUMN", Some("verse_key"))?,
                text_column: get_var(&lookup, "QURAN_TEXT_COLUMN", Some("text_uthmani"))?,
            },
        })
    }
}

/// Log level and optional OTLP collector for `init_tracing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingSettings {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl TracingSettings {
    /// Apply any `.env` file in the working directory, then read
    /// `LOG_LEVEL` and `OTLP_ENDPOINT`.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_source(|key| env::var(key).ok())
    }

    pub fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            log_level: lookup("LOG_LEVEL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "info".to_string()),
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|v| !v.trim().is_empty()),
        }
    }
}

/// Blank values count as unset.
fn get_var<F>(lookup: &F, key: &str, default: Option<&str>) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(val) => Ok(val),
        None => default.map(str::to_string).ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!("{} environment variable not set", key))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let err = TafsirConfig::from_source(core_config::Config::default(), lookup(&[]))
            .unwrap_err();

        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let result = TafsirConfig::from_source(
            core_config::Config::default(),
            lookup(&[("GROQ_API_KEY", "   ")]),
        );

        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = TafsirConfig::from_source(
            core_config::Config::default(),
            lookup(&[("GROQ_API_KEY", "gsk_test")]),
        )
        .unwrap();

        assert_eq!(config.llm.api_key.expose_secret(), "gsk_test");
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert_eq!(config.llm.base_url, DEFAULT_API_BASE);
        assert_eq!(config.llm.timeout, Duration::from_secs(120));
        assert_eq!(config.dataset.path, PathBuf::from("quran_arabic.csv"));
        assert_eq!(config.dataset.key_column, "verse_key");
        assert_eq!(config.dataset.text_column, "text_uthmani");
    }

    #[test]
    fn overrides_are_honoured() {
        let config = TafsirConfig::from_source(
            core_config::Config::default(),
            lookup(&[
                ("GROQ_API_KEY", "gsk_test"),
                ("GROQ_MODEL", "llama-3.3-70b-versatile"),
                ("GROQ_TIMEOUT_SECS", "15"),
                ("QURAN_DATASET_PATH", "/data/quran.csv"),
            ]),
        )
        .unwrap();

        assert_eq!(config.llm.model, "llama-3.3-70b-versatile");
        assert_eq!(config.llm.timeout, Duration::from_secs(15));
        assert_eq!(config.dataset.path, PathBuf::from("/data/quran.csv"));
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        let result = TafsirConfig::from_source(
            core_config::Config::default(),
            lookup(&[("GROQ_API_KEY", "gsk_test"), ("GROQ_TIMEOUT_SECS", "soon")]),
        );

        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = TafsirConfig::from_source(
            core_config::Config::default(),
            lookup(&[("GROQ_API_KEY", "gsk_test"), ("GROQ_TIMEOUT_SECS", "0")]),
        )
        .unwrap_err();

        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn tracing_settings_default_to_info_without_otlp() {
        let settings = TracingSettings::from_source(lookup(&[("OTLP_ENDPOINT", " ")]));

        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.otlp_endpoint, None);
    }

    #[test]
    fn dotenv_file_feeds_tracing_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "LOG_LEVEL=debug\nOTLP_ENDPOINT=http://collector:4317\n",
        )
        .unwrap();

        let vars: HashMap<String, String> = dotenvy::from_path_iter(&path)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        let settings = TracingSettings::from_source(|key| vars.get(key).cloned());

        assert_eq!(settings.log_level, "debug");
        assert_eq!(
            settings.otlp_endpoint.as_deref(),
            Some("http://collector:4317")
        );
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = TafsirConfig::from_source(
            core_config::Config::default(),
            lookup(&[("GROQ_API_KEY", "gsk_super_secret")]),
        )
        .unwrap();

        assert!(!format!("{:?}", config).contains("gsk_super_secret"));
    }
}
