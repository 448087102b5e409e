//! Model listing command.
//!
//! `qa models` prints the built-in manifest with each model's cache status.
//! The model selected by the current configuration is marked as active.

use anyhow::Result;

use crate::config::Config;
use crate::hub;

pub fn list_models(config: &Config) -> Result<()> {
    let root = hub::cache_root(config)?;

    println!("{:<56} {:<52} CACHED", "MODEL", "REPO");
    for spec in hub::manifest() {
        let name = if spec.name == config.model.name {
            format!("{} (active)", spec.name)
        } else {
            spec.name.to_string()
        };
        let cached = if hub::is_cached(spec, &root) {
            "yes"
        } else {
            "no"
        };
        println!("{:<56} {:<52} {}", name, spec.repo, cached);
    }

    Ok(())
}
