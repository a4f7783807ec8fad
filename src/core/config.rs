//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{FrzError, Result};
use crate::core::paths;
use crate::inventory::layout::{FreezerSpec, Layout, LayoutPreset};
use crate::inventory::share::DEFAULT_SHARE_BASE_URL;

/// Full configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub paths: PathsConfig,
    pub ui: UiConfig,
    pub share: ShareConfig,
}

/// Which freezer table to use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct LayoutConfig {
    pub preset: LayoutPreset,
    /// Custom table; when non-empty it replaces the preset.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub freezers: Vec<FreezerSpec>,
}

/// Filesystem paths used by frz.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    pub state_file: PathBuf,
    pub activity_log: PathBuf,
}

/// Interactive view behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    /// Ring the terminal bell on each slot toggle.
    pub haptics: bool,
    /// Ask before clearing a freezer or resetting everything.
    pub confirm_destructive: bool,
}

/// Report sharing target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShareConfig {
    /// Prefix the encoded report is appended to.
    pub base_url: String,
    /// Program used to open the link; platform default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opener: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let data = paths::data_dir();
        Self {
            config_file: paths::config_dir().join("config.toml"),
            state_file: data.join("freezers.json"),
            activity_log: data.join("activity.jsonl"),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            haptics: true,
            confirm_destructive: true,
        }
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            opener: None,
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| FrzError::Io {
                path: path_buf.clone(),
                source,
            })?;
            toml::from_str::<Self>(&raw)?
        } else if is_explicit_path {
            return Err(FrzError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.normalize_paths();
        cfg.validate()?;
        Ok(cfg)
    }

    /// The validated freezer table this config selects.
    pub fn build_layout(&self) -> Result<Layout> {
        if self.layout.freezers.is_empty() {
            Ok(Layout::preset(self.layout.preset))
        } else {
            Layout::from_specs(&self.layout.freezers)
        }
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("FRZ_LAYOUT_PRESET") {
            self.layout.preset =
                raw.parse::<LayoutPreset>()
                    .map_err(|details| FrzError::ConfigParse {
                        context: "env",
                        details: format!("FRZ_LAYOUT_PRESET={raw:?}: {details}"),
                    })?;
        }
        if let Some(raw) = lookup("FRZ_STATE_FILE") {
            self.paths.state_file = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("FRZ_ACTIVITY_LOG") {
            self.paths.activity_log = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("FRZ_UI_HAPTICS") {
            self.ui.haptics = parse_env_bool("FRZ_UI_HAPTICS", &raw)?;
        }
        if let Some(raw) = lookup("FRZ_UI_CONFIRM_DESTRUCTIVE") {
            self.ui.confirm_destructive = parse_env_bool("FRZ_UI_CONFIRM_DESTRUCTIVE", &raw)?;
        }
        if let Some(raw) = lookup("FRZ_SHARE_BASE_URL") {
            self.share.base_url = raw;
        }
        if let Some(raw) = lookup("FRZ_SHARE_OPENER") {
            self.share.opener = Some(raw);
        }
        Ok(())
    }

    fn normalize_paths(&mut self) {
        self.paths.state_file = paths::expand_home(&self.paths.state_file);
        self.paths.activity_log = paths::expand_home(&self.paths.activity_log);
    }

    pub fn validate(&self) -> Result<()> {
        self.build_layout()?;

        if self.share.base_url.trim().is_empty() {
            return Err(FrzError::InvalidConfig {
                details: "share.base_url must not be empty".to_string(),
            });
        }
        if self
            .share
            .opener
            .as_deref()
            .is_some_and(|o| o.trim().is_empty())
        {
            return Err(FrzError::InvalidConfig {
                details: "share.opener must not be blank when set".to_string(),
            });
        }
        if self.paths.state_file.as_os_str().is_empty() {
            return Err(FrzError::InvalidConfig {
                details: "paths.state_file must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    raw.trim()
        .parse::<bool>()
        .map_err(|error| FrzError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}
