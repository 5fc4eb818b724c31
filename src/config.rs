use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default listener port when neither config nor `PORT` is set
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FormbaseConfig {
    pub port: Option<u16>,
    pub database: Option<String>,
    /// Path to a raw SQL setup script executed when the database is opened
    pub init_script: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("formbase.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<FormbaseConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: FormbaseConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

/// Resolves the listener port from the `PORT` environment variable
pub fn port_from_env() -> anyhow::Result<u16> {
    parse_port(std::env::var("PORT").ok())
}

fn parse_port(raw: Option<String>) -> anyhow::Result<u16> {
    match raw {
        Some(value) => value
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("invalid PORT value: {value:?}")),
        None => Ok(DEFAULT_PORT),
    }
}
