use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Model name as listed in the built-in manifest (`qa models`).
    #[serde(default = "default_model_name")]
    pub name: String,
    /// Inference backend. Only `tract` is available.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Maximum encoded length of question + context per window.
    #[serde(default = "default_max_seq_len")]
    pub max_seq_len: usize,
    /// Token overlap between consecutive context windows when the passage
    /// does not fit into a single window.
    #[serde(default = "default_doc_stride")]
    pub doc_stride: usize,
    /// Maximum answer span length in tokens.
    #[serde(default = "default_max_answer_len")]
    pub max_answer_len: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            backend: default_backend(),
            max_seq_len: default_max_seq_len(),
            doc_stride: default_doc_stride(),
            max_answer_len: default_max_answer_len(),
        }
    }
}

fn default_model_name() -> String {
    "distilbert-base-cased-distilled-squad".to_string()
}
fn default_backend() -> String {
    "tract".to_string()
}
fn default_max_seq_len() -> usize {
    384
}
fn default_doc_stride() -> usize {
    128
}
fn default_max_answer_len() -> usize {
    30
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CacheConfig {
    /// Cache root for downloaded model files.
    /// Defaults to `~/.cache/qa-harness/models`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Load configuration from a TOML file.
///
/// A missing file is not an error; the defaults describe a fully working
/// setup. A file that exists but does not parse or validate is an error.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    load_config(path)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.model.name.trim().is_empty() {
        anyhow::bail!("model.name must not be empty");
    }
    if config.model.max_seq_len == 0 {
        anyhow::bail!("model.max_seq_len must be > 0");
    }
    if config.model.doc_stride >= config.model.max_seq_len {
        anyhow::bail!("model.doc_stride must be < model.max_seq_len");
    }
    if config.model.max_answer_len == 0 {
        anyhow::bail!("model.max_answer_len must be > 0");
    }
    match config.model.backend.as_str() {
        "tract" => {}
        other => anyhow::bail!("Unknown inference backend: '{}'. Must be tract.", other),
    }
    Ok(())
}

impl Config {
    /// Merge environment overrides into the config. `QA_MODEL` replaces the
    /// model name, `QA_CACHE_DIR` the cache root. Called once at startup;
    /// nothing reads the environment after this.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    fn apply_env_from(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(name) = get("QA_MODEL") {
            if !name.trim().is_empty() {
                self.model.name = name.trim().to_string();
            }
        }
        if let Some(dir) = get("QA_CACHE_DIR") {
            if !dir.trim().is_empty() {
                self.cache.dir = Some(PathBuf::from(dir.trim()));
            }
        }
    }
}
