//! Invoker configuration: defaults, environment overrides, TOML files.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::DialogError;

pub const DEFAULT_PATH: &str = "/usr/bin/zenity";
pub const DEFAULT_SHELL: &str = "/bin/sh";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dialog executable. Bare names are looked up on `PATH`.
    pub path: PathBuf,
    /// Shell used to run rendered command lines.
    pub shell: PathBuf,
    /// Merge stderr into the output of value-returning dialogs.
    pub capture_stderr: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            path: PathBuf::from(DEFAULT_PATH),
            shell: PathBuf::from(DEFAULT_SHELL),
            capture_stderr: true,
        }
    }
}

impl Config {
    /// Defaults overridden by `ZENITY_PATH` and `ZENITY_SHELL`.
    pub fn from_env() -> Self {
        Self::default().with_env(|k| std::env::var(k).ok())
    }

    pub fn from_toml_str(s: &str) -> Result<Self, DialogError> {
        toml::from_str(s).map_err(|e| DialogError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, DialogError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DialogError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&raw)
    }

    fn with_env<F: Fn(&str) -> Option<String>>(mut self, get: F) -> Self {
        if let Some(p) = get("ZENITY_PATH").filter(|v| !v.is_empty()) { self.path = p.into(); }
        if let Some(s) = get("ZENITY_SHELL").filter(|v| !v.is_empty()) { self.shell = s.into(); }
        self
    }
}
