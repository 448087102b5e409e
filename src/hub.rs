//! Model manifest and Hugging Face Hub cache.
//!
//! Model files (ONNX weights + tokenizer) are downloaded on first use and
//! cached under `~/.cache/qa-harness/models/<name>/`. After the initial
//! download no network access is needed; inference runs entirely offline.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::config::Config;

/// A manifest entry: where a named model's files live on the Hub.
#[derive(Debug, Clone, Copy)]
pub struct ModelSpec {
    pub name: &'static str,
    pub repo: &'static str,
    pub onnx_file: &'static str,
    pub tokenizer_file: &'static str,
}

/// Extractive QA models known to the harness. The ONNX exports are pulled
/// from the transformers.js mirrors, which ship `onnx/model.onnx` alongside
/// the fast tokenizer.
const MANIFEST: &[ModelSpec] = &[
    ModelSpec {
        name: "distilbert-base-cased-distilled-squad",
        repo: "Xenova/distilbert-base-cased-distilled-squad",
        onnx_file: "onnx/model.onnx",
        tokenizer_file: "tokenizer.json",
    },
    ModelSpec {
        name: "distilbert-base-uncased-distilled-squad",
        repo: "Xenova/distilbert-base-uncased-distilled-squad",
        onnx_file: "onnx/model.onnx",
        tokenizer_file: "tokenizer.json",
    },
];

pub fn manifest() -> &'static [ModelSpec] {
    MANIFEST
}

pub fn resolve(model_name: &str) -> Result<&'static ModelSpec> {
    match MANIFEST.iter().find(|spec| spec.name == model_name) {
        Some(spec) => Ok(spec),
        None => bail!(
            "Unknown model: '{}'. Run `qa models` to list supported models.",
            model_name
        ),
    }
}

/// Resolved on-disk locations of a model's files.
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub onnx: PathBuf,
    pub tokenizer: PathBuf,
}

/// Cache root: configured dir, or `~/.cache/qa-harness/models`.
pub fn cache_root(config: &Config) -> Result<PathBuf> {
    let dir = match &config.cache.dir {
        Some(dir) => dir.clone(),
        None => {
            let base = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(base)
                .join(".cache")
                .join("qa-harness")
                .join("models")
        }
    };
    std::fs::create_dir_all(&dir).map_err(|e| anyhow::anyhow!("Create cache dir: {}", e))?;
    Ok(dir)
}

pub fn model_files(spec: &ModelSpec, cache_root: &Path) -> ModelFiles {
    let model_dir = cache_root.join(spec.name);
    ModelFiles {
        onnx: model_dir.join(spec.onnx_file),
        tokenizer: model_dir.join(spec.tokenizer_file),
    }
}

pub fn is_cached(spec: &ModelSpec, cache_root: &Path) -> bool {
    let files = model_files(spec, cache_root);
    files.onnx.exists() && files.tokenizer.exists()
}

fn download_to_cache(repo: &str, path: &str, cache_path: &Path) -> Result<()> {
    if cache_path.exists() {
        return Ok(());
    }
    let url = format!(
        "https://huggingface.co/{}/resolve/main/{}",
        repo,
        path.replace(' ', "%20")
    );
    let resp = reqwest::blocking::get(&url)
        .map_err(|e| anyhow::anyhow!("Download {}: {}", url, e))?
        .error_for_status()
        .map_err(|e| anyhow::anyhow!("Download {}: {}", url, e))?;
    let bytes = resp
        .bytes()
        .map_err(|e| anyhow::anyhow!("Read body: {}", e))?;
    if let Some(parent) = cache_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Create cache parent: {}", e))?;
    }
    std::fs::write(cache_path, &bytes).map_err(|e| anyhow::anyhow!("Write cache: {}", e))?;
    Ok(())
}

/// Ensure weights and tokenizer are in cache; downloads whatever is missing.
pub fn ensure_cached(spec: &ModelSpec, cache_root: &Path) -> Result<ModelFiles> {
    let files = model_files(spec, cache_root);
    download_to_cache(spec.repo, spec.onnx_file, &files.onnx)?;
    download_to_cache(spec.repo, spec.tokenizer_file, &files.tokenizer)?;
    Ok(files)
}
