mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable overriding `storage.samples_path`.
pub const SAMPLES_PATH_ENV: &str = "SEEKBACK_SAMPLES_PATH";

/// Older name for [`SAMPLES_PATH_ENV`], still honoured when the new one is
/// unset.
pub const LEGACY_SAMPLES_PATH_ENV: &str = "SEEKBACK_SERVER_SAMPLES_PATH";

/// Environment variable overriding `storage.db_path`.
pub const DB_PATH_ENV: &str = "SEEKBACK_DB_PATH";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./seekback.toml",
        "./config.toml",
        "~/.config/seekback/config.toml",
        "/etc/seekback/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    let mut config = Config::default();
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// Apply `SEEKBACK_*` environment overrides. Empty values are ignored.
fn apply_env_overrides(config: &mut Config) {
    let samples = env_path(SAMPLES_PATH_ENV).or_else(|| env_path(LEGACY_SAMPLES_PATH_ENV));
    if let Some(path) = samples {
        config.storage.samples_path = path;
    }
    if let Some(path) = env_path(DB_PATH_ENV) {
        config.storage.db_path = path;
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let storage = &config.storage;

    if storage.samples_path.as_os_str().is_empty() {
        anyhow::bail!("storage.samples_path cannot be empty");
    }
    if storage.db_path.as_os_str().is_empty() {
        anyhow::bail!("storage.db_path cannot be empty");
    }
    if !storage.samples_path.is_dir() {
        tracing::warn!("Samples path does not exist: {:?}", storage.samples_path);
    }

    for (name, ext) in [
        ("summary_ext", &storage.summary_ext),
        ("transcript_ext", &storage.transcript_ext),
    ] {
        if ext.is_empty() || ext.contains('.') {
            anyhow::bail!("storage.{} must be a bare extension, got {:?}", name, ext);
        }
        if config.media_types.is_media_ext(ext) {
            anyhow::bail!("storage.{} {:?} is also a media extension", name, ext);
        }
    }
    if storage.summary_ext.eq_ignore_ascii_case(&storage.transcript_ext) {
        anyhow::bail!("Summary and transcript sidecars cannot share an extension");
    }

    if config.media_types.is_empty() {
        anyhow::bail!("At least one media type must be configured");
    }
    for ext in config.media_types.extensions() {
        if ext.is_empty() || ext.contains('.') {
            anyhow::bail!("Invalid media extension {:?}", ext);
        }
    }

    if config.watch.enabled && config.watch.interval_secs == 0 {
        anyhow::bail!("watch.interval_secs cannot be 0");
    }

    Ok(())
}
