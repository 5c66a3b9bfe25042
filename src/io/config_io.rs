use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Environment variable overriding the configured journal root
pub const ROOT_ENV: &str = "DAYBOOK_ROOT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("no journal root configured: pass --root, set DAYBOOK_ROOT, or set `root` in {0}")]
    NoRoot(PathBuf),
}

/// Default config location, respecting XDG_CONFIG_HOME
pub fn default_config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    config_dir.join("daybook").join("config.toml")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Load the config at `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Pick the journal root: explicit flag, then environment, then config.
pub fn resolve_root(
    flag: Option<&Path>,
    env: Option<PathBuf>,
    config: &Config,
    config_path: &Path,
) -> Result<PathBuf, ConfigError> {
    flag.map(Path::to_path_buf)
        .or(env.filter(|p| !p.as_os_str().is_empty()))
        .or_else(|| config.root.clone())
        .ok_or_else(|| ConfigError::NoRoot(config_path.to_path_buf()))
}
