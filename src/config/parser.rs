use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Relative `output` paths are resolved against the directory holding the
/// configuration file, so a run behaves the same from any working directory.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_scribe::config::load_config;
///
/// let config = load_config(Path::new("scribe.toml")).unwrap();
/// println!("Concurrency: {}", config.crawler.max_concurrency);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let mut config: Config = toml::from_str(&content)?;

    if let Some(base) = path.parent() {
        resolve_relative_paths(&mut config, base);
    }

    validate(&config)?;

    Ok(config)
}

/// Parses and validates configuration text; paths are taken as written
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn resolve_relative_paths(config: &mut Config, base: &Path) {
    let output = &mut config.output;
    if output.output_root.is_relative() {
        output.output_root = base.join(&output.output_root);
    }
    if output.visited_file.is_relative() {
        output.visited_file = base.join(&output.visited_file);
    }
    if let Some(dir) = output.log_dir.as_mut() {
        if dir.is_relative() {
            *dir = base.join(&*dir);
        }
    }
    if let Some(sites) = output.sites_file.as_mut() {
        if sites.is_relative() {
            *sites = base.join(&*sites);
        }
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so runs can be matched to the configuration they used.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
