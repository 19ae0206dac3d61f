//! Configuration Management
//!
//! This module loads named database connection profiles.
//!
//! # Configuration Locations
//! - Local: `.roster/config.json` (team-shareable, per-project)
//! - Global: `~/.config/roster/config.json` (per-user)
//!
//! # Resolution Precedence
//! 1. Profile named on the command line (`--connection`)
//! 2. `default` profile (local `default` wins over global `default`)
//! 3. Built-in fallback: `SQLite` file `roster.db` in the working directory
//!
//! Local profiles override global profiles with the same name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::ConnectionConfig;
use crate::error::{Result, RosterError};

/// File name of the built-in `SQLite` fallback database
pub const DEFAULT_SQLITE_FILE: &str = "roster.db";

/// Contents of one configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Named connection profiles
    #[serde(default)]
    pub connections: BTreeMap<String, StoredConnection>,

    /// Name of the default profile (must exist in `connections`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Stored connection profile
///
/// Like `ConnectionConfig`, but the password may come from an environment
/// variable instead of the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredConnection {
    /// Connection configuration
    #[serde(flatten)]
    pub config: ConnectionConfig,

    /// Environment variable name for password (if not storing password directly)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,
}

impl StoredConnection {
    /// Resolve environment variables and return a `ConnectionConfig`
    pub fn resolve(&self) -> Result<ConnectionConfig> {
        let mut config = self.config.clone();

        if let Some(env_var) = &self.password_env {
            match std::env::var(env_var) {
                Ok(password) => config.password = Some(password),
                Err(_) => {
                    return Err(RosterError::config_error(format!(
                        "Environment variable {env_var} not found for password"
                    )));
                }
            }
        }

        Ok(config)
    }
}

impl RosterConfig {
    /// Overlay `local` on top of `self`: local profiles and default win
    #[must_use]
    pub fn merged_with(mut self, local: Self) -> Self {
        self.connections.extend(local.connections);
        if local.default.is_some() {
            self.default = local.default;
        }
        self
    }

    /// Pick a profile by name, else the default, else the `SQLite` fallback
    pub fn resolve(&self, name: Option<&str>) -> Result<ConnectionConfig> {
        let profile = match name.or(self.default.as_deref()) {
            Some(profile) => profile,
            None => {
                tracing::debug!("no connection profile configured, using {DEFAULT_SQLITE_FILE}");
                return Ok(ConnectionConfig::sqlite(PathBuf::from(DEFAULT_SQLITE_FILE)));
            }
        };

        let stored = self.connections.get(profile).ok_or_else(|| {
            let available: Vec<_> = self.connections.keys().collect();
            RosterError::config_error(format!(
                "Connection '{profile}' not found. Available connections: {available:?}"
            ))
        })?;

        stored.resolve()
    }
}

/// Get path to local config file (`.roster/config.json`)
pub fn local_config_path() -> Result<PathBuf> {
    let current_dir = std::env::current_dir().map_err(|e| {
        RosterError::config_error(format!("Could not determine current directory: {e}"))
    })?;

    Ok(current_dir.join(".roster").join("config.json"))
}

/// Get path to global config file (`~/.config/roster/config.json`)
pub fn global_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| RosterError::config_error("Could not determine user config directory"))?;

    Ok(config_dir.join("roster").join("config.json"))
}

/// Load one configuration file; a missing file is an empty config
pub fn load_config(path: &Path) -> Result<RosterConfig> {
    if !path.exists() {
        return Ok(RosterConfig::default());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| RosterError::config_error(format!("Could not read config file: {e}")))?;

    serde_json::from_str(&contents).map_err(|e| {
        RosterError::config_error(format!("Invalid config file {}: {e}", path.display()))
    })
}

/// Load global then local configuration, local taking precedence
pub fn load_with_precedence() -> Result<RosterConfig> {
    // A missing home directory only disables the global layer
    let global = match global_config_path() {
        Ok(path) => load_config(&path)?,
        Err(e) => {
            tracing::debug!("skipping global config: {e}");
            RosterConfig::default()
        }
    };
    let local = load_config(&local_config_path()?)?;

    Ok(global.merged_with(local))
}

/// Resolve the connection to use for this run
pub fn resolve_connection(name: Option<&str>) -> Result<ConnectionConfig> {
    load_with_precedence()?.resolve(name)
}
