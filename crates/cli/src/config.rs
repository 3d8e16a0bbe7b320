//! Optional YAML configuration
//!
//! Looked up at `--config`, then `$FOOTSWITCH_CONFIG`, then
//! `<config dir>/footswitch/config.yaml`. Only the last location may be
//! absent.

use anyhow::Result;
use footswitch_hid_common::DeviceMatch;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::devices::Model;
use crate::error::CliError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Model used when `--model` is not given.
    #[serde(default)]
    pub default_model: Option<Model>,

    /// Rebadged devices to treat as one of the supported models.
    #[serde(default)]
    pub extra_devices: Vec<ExtraDevice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtraDevice {
    pub model: Model,
    pub vendor_id: u16,
    pub product_id: u16,
    #[serde(default)]
    pub interface: Option<i32>,
}

impl ExtraDevice {
    pub fn to_match(&self) -> DeviceMatch {
        match self.interface {
            Some(interface) => {
                DeviceMatch::on_interface(self.vendor_id, self.product_id, interface)
            }
            None => DeviceMatch::new(self.vendor_id, self.product_id),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("footswitch").join("config.yaml"))
}

/// Loads the configuration; `explicit` comes from `--config` or the environment.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => load_file(path),
        None => match default_config_path() {
            Some(path) if path.exists() => load_file(&path),
            _ => Ok(Config::default()),
        },
    }
}

pub fn load_file(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path).map_err(|e| {
        CliError::InvalidConfiguration(format!("cannot read {}: {e}", path.display()))
    })?;
    let config = parse(&text).map_err(|e| {
        CliError::InvalidConfiguration(format!("{}: {e}", path.display()))
    })?;
    debug!(path = %path.display(), ?config, "loaded configuration");
    Ok(config)
}

pub fn parse(text: &str) -> Result<Config, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(text)
}
