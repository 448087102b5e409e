//! Model download command.
//!
//! `qa fetch` resolves the configured model and makes sure its weights and
//! tokenizer are in the local cache, downloading whatever is missing. Safe to
//! run repeatedly; cached files are never re-fetched.

use anyhow::Result;

use crate::config::Config;
use crate::hub;

pub fn run_fetch(config: &Config) -> Result<()> {
    let spec = hub::resolve(&config.model.name)?;
    let root = hub::cache_root(config)?;

    if hub::is_cached(spec, &root) {
        println!("Model '{}' is already cached.", spec.name);
    } else {
        println!(
            "Fetching '{}' from https://huggingface.co/{}",
            spec.name, spec.repo
        );
    }

    let files = hub::ensure_cached(spec, &root)?;
    println!("{:<12} {}", "weights", files.onnx.display());
    println!("{:<12} {}", "tokenizer", files.tokenizer.display());
    Ok(())
}
