//! Configuration loading for the window loop.
//!
//! Parses `termwin.toml` (or an override path provided by the binary). Every
//! field is optional; missing sections take the defaults below. Unknown fields
//! are ignored so older binaries tolerate newer files.
//!
//! ```toml
//! [loop]
//! poll_timeout_ms = 100
//! idle_sleep_ms = 10
//!
//! [resize]
//! register_handler = true
//!
//! [input]
//! quit_on_interrupt = true
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const FILE_NAME: &str = "termwin.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoopConfig {
    #[serde(default = "LoopConfig::default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
    #[serde(default = "LoopConfig::default_idle_sleep_ms")]
    pub idle_sleep_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: Self::default_poll_timeout_ms(),
            idle_sleep_ms: Self::default_idle_sleep_ms(),
        }
    }
}

impl LoopConfig {
    const fn default_poll_timeout_ms() -> u64 {
        100
    }
    const fn default_idle_sleep_ms() -> u64 {
        10
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ResizeConfig {
    #[serde(default = "default_true")]
    pub register_handler: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            register_handler: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct InputConfig {
    /// Ctrl-C closes every window.
    #[serde(default = "default_true")]
    pub quit_on_interrupt: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            quit_on_interrupt: true,
        }
    }
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default, rename = "loop")]
    pub event_loop: LoopConfig,
    #[serde(default)]
    pub resize: ResizeConfig,
    #[serde(default)]
    pub input: InputConfig,
}

/// Runtime knobs of the window controller loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub poll_timeout: Duration,
    pub idle_sleep: Duration,
    pub register_resize_handler: bool,
    pub quit_on_interrupt: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ConfigFile::default().controller()
    }
}

impl ConfigFile {
    pub fn controller(&self) -> ControllerConfig {
        ControllerConfig {
            poll_timeout: Duration::from_millis(self.event_loop.poll_timeout_ms),
            idle_sleep: Duration::from_millis(self.event_loop.idle_sleep_ms),
            register_resize_handler: self.resize.register_handler,
            quit_on_interrupt: self.input.quit_on_interrupt,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Path the settings were read from; `None` when defaults are in use.
    pub source: Option<PathBuf>,
    pub file: ConfigFile,
}

impl Config {
    pub fn controller(&self) -> ControllerConfig {
        self.file.controller()
    }
}

/// Best-effort config path: `./termwin.toml` first, then the platform config
/// directory (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("termwin").join(FILE_NAME);
    }
    local
}

/// Load `path` (or the discovered path). A missing or unparsable file yields
/// defaults.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_missing_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                source: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(
                target: "config",
                path = %path.display(),
                error = %e,
                "config_parse_failed_using_defaults"
            );
            Ok(Config::default())
        }
    }
}
