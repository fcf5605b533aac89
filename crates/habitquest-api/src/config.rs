//! Command line and environment configuration for the API server.

use clap::Parser;
use habitquest_core::{HabitError, TopK, DEFAULT_TOP_K};
use habitquest_llm::providers::{GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL};
use habitquest_llm::{GeminiConfig, GenerationSettings};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Serve habit recommendations over HTTP.
#[derive(Debug, Clone, Parser)]
#[command(name = "habitquest-api", about = "HabitQuest recommendation API")]
pub struct ApiConfig {
    /// Address to listen on
    #[arg(long, env = "HABITQUEST_BIND_ADDR", default_value = "127.0.0.1:8000")]
    pub bind_addr: SocketAddr,

    /// Postgres connection string; takes precedence over --dataset as corpus source
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// JSON habit dataset, read on every request unless a database is configured
    #[arg(long, env = "HABITQUEST_DATASET")]
    pub dataset: Option<PathBuf>,

    /// Import --dataset into the database at startup when the table is empty
    #[arg(long)]
    pub seed_database: bool,

    /// Recommendations returned when a request does not pass top_k
    #[arg(long, env = "HABITQUEST_TOP_K", default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,

    /// Gemini API key; the generative route is disabled without it
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL", default_value = GEMINI_DEFAULT_MODEL)]
    pub gemini_model: String,

    /// Gemini REST base URL
    #[arg(long, env = "GEMINI_BASE_URL", default_value = GEMINI_BASE_URL)]
    pub gemini_base_url: String,

    /// Gemini request timeout in seconds
    #[arg(long, env = "GEMINI_TIMEOUT_SECS", default_value_t = 30)]
    pub gemini_timeout_secs: u64,

    /// Gemini sampling temperature
    #[arg(long, env = "GEMINI_TEMPERATURE", default_value_t = 0.7)]
    pub gemini_temperature: f32,
}

/// Where the recommendation corpus is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusSource {
    /// A Postgres `habits` table.
    Postgres(String),
    /// A JSON dataset file.
    JsonFile(PathBuf),
    /// Nothing configured; the corpus stays empty.
    Empty,
}

impl ApiConfig {
    /// Rejects settings the server cannot run with.
    pub fn validate(&self) -> Result<(), HabitError> {
        self.default_top_k()?;
        if self.gemini_timeout_secs == 0 {
            return Err(HabitError::ConfigError(
                "GEMINI_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.gemini_temperature) {
            return Err(HabitError::ConfigError(
                "GEMINI_TEMPERATURE must be between 0.0 and 2.0".to_string(),
            ));
        }
        if self.seed_database && (self.database_url.is_none() || self.dataset.is_none()) {
            return Err(HabitError::ConfigError(
                "--seed-database needs both DATABASE_URL and HABITQUEST_DATASET".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured default `top_k`.
    pub fn default_top_k(&self) -> Result<TopK, HabitError> {
        TopK::new(self.top_k).map_err(|_| {
            HabitError::ConfigError("HABITQUEST_TOP_K must be a positive integer".to_string())
        })
    }

    /// Corpus source, preferring the database.
    pub fn corpus_source(&self) -> CorpusSource {
        match (&self.database_url, &self.dataset) {
            (Some(url), _) => CorpusSource::Postgres(url.clone()),
            (None, Some(path)) => CorpusSource::JsonFile(path.clone()),
            (None, None) => CorpusSource::Empty,
        }
    }

    /// Gemini connection settings, or `None` when no usable key is set.
    pub fn gemini_config(&self) -> Option<GeminiConfig> {
        let key = self
            .gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())?;
        Some(GeminiConfig {
            api_key: key.to_string(),
            model: self.gemini_model.clone(),
            base_url: self.gemini_base_url.clone(),
            timeout: Duration::from_secs(self.gemini_timeout_secs),
        })
    }

    /// Sampling settings for generated recommendations.
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            temperature: self.gemini_temperature,
            ..GenerationSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ApiConfig {
        let mut argv = vec!["habitquest-api"];
        argv.extend_from_slice(args);
        ApiConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_explicit_arguments() {
        let config = parse(&[
            "--bind-addr",
            "0.0.0.0:9000",
            "--top-k",
            "3",
            "--dataset",
            "habits.json",
            "--gemini-api-key",
            "abc",
            "--gemini-model",
            "gemini-test",
        ]);
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.default_top_k().unwrap().get(), 3);

        let gemini = config.gemini_config().unwrap();
        assert_eq!(gemini.api_key, "abc");
        assert_eq!(gemini.model, "gemini-test");
    }

    #[test]
    fn test_zero_top_k_is_rejected() {
        let config = parse(&["--top-k", "0"]);
        assert!(matches!(config.validate(), Err(HabitError::ConfigError(_))));
    }

    #[test]
    fn test_out_of_range_temperature_is_rejected() {
        let config = parse(&["--gemini-temperature", "3.5"]);
        assert!(matches!(config.validate(), Err(HabitError::ConfigError(_))));
    }

    #[test]
    fn test_blank_gemini_key_disables_generation() {
        let config = parse(&["--gemini-api-key", "   "]);
        assert!(config.gemini_config().is_none());
    }

    #[test]
    fn test_database_takes_precedence_over_dataset() {
        let config = parse(&[
            "--database-url",
            "postgres://localhost/habitquest",
            "--dataset",
            "habits.json",
        ]);
        assert_eq!(
            config.corpus_source(),
            CorpusSource::Postgres("postgres://localhost/habitquest".to_string())
        );
    }
}
