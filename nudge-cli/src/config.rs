use anyhow::{Context, Result};
use nudge_core::{ProfileSettings, UserProfile};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::Home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub profile: ProfileSettings,
    pub dispatch: DispatchSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSection {
    /// Max payloads handed to the delivery layer per `dispatch` run.
    pub max_per_run: usize,
    /// Also dispatch payloads due within the next N minutes.
    pub include_future_minutes: i64,
}

impl Default for DispatchSection {
    fn default() -> Self {
        Self {
            max_per_run: 10,
            include_future_minutes: 0,
        }
    }
}

impl Config {
    pub fn user_profile(&self) -> Result<UserProfile> {
        UserProfile::from_settings(&self.profile).context("invalid [profile] in config.toml")
    }
}

pub fn config_path(home: &Home) -> Result<PathBuf> {
    Ok(home.ensure()?.join("config.toml"))
}

pub fn load_config(home: &Home) -> Result<Config> {
    let p = config_path(home)?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(home: &Home, cfg: &Config) -> Result<()> {
    let p = config_path(home)?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Write a default config unless one exists. Returns whether a file was written.
pub fn init_config(home: &Home) -> Result<bool> {
    let p = config_path(home)?;
    if p.exists() {
        return Ok(false);
    }
    save_config(home, &Config::default())?;
    Ok(true)
}
