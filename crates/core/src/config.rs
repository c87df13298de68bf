//! TOML configuration loading.
//!
//! Sections are owned by the crates that consume them; this module only knows
//! how to find a file and turn it into any `Deserialize` type. The window
//! section lives here because both the platform and app crates read it.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::{Error, Result};

/// Environment variable naming a config file when no path is given on the command line.
pub const CONFIG_ENV_VAR: &str = "FRAMEVIEW_CONFIG";

/// Window settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial client width in pixels.
    pub width: u32,
    /// Initial client height in pixels.
    pub height: u32,
    /// Window title; the frame-rate label is appended to it.
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "frameview".to_string(),
        }
    }
}

/// Parse a TOML document into `T`.
///
/// `origin` is only used to label errors.
pub fn parse_toml<T: DeserializeOwned>(source: &str, origin: &Path) -> Result<T> {
    toml::from_str(source).map_err(|e| Error::Config {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load `T` from a TOML file.
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let source = std::fs::read_to_string(path)?;
    debug!("Read {} bytes of config from {}", source.len(), path.display());
    parse_toml(&source, path)
}

/// Pick the config path: explicit argument first, then `FRAMEVIEW_CONFIG`.
pub fn config_path(arg: Option<String>) -> Option<PathBuf> {
    arg.or_else(|| std::env::var(CONFIG_ENV_VAR).ok())
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
}

/// Load `T` from `path` when given, falling back to `T::default()` otherwise.
///
/// A named file that does not exist is an error; silently running with
/// defaults would hide a typo in the path.
pub fn load_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    match path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            load_toml(path)
        }
        None => Ok(T::default()),
    }
}
