use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted navigation selection plus display preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub workspace: String,
    #[serde(default = "default_show_vars")]
    pub workspace_show_vars: bool,

    /// Where `save()` writes to. `None` keeps the config in memory only.
    #[serde(skip)]
    path: Option<PathBuf>,
}

fn default_show_vars() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            organization: String::new(),
            workspace: String::new(),
            workspace_show_vars: default_show_vars(),
            path: None,
        }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("terrui")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".terrui")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config from the default location, creating it if missing.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(config_path)
    }

    /// Load the config from `path`, writing defaults there if the file doesn't exist yet.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = path.into();
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, creating default config");
            let config = Self {
                path: Some(config_path),
                ..Self::default()
            };
            config.save()?;
            return Ok(config);
        }

        let config_content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let mut config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
        config.path = Some(config_path);

        debug!(
            "Loaded config (organization={:?}, workspace={:?})",
            config.organization, config.workspace
        );
        Ok(config)
    }

    /// A config that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn save(&self) -> Result<()> {
        let Some(config_path) = &self.path else {
            debug!("In-memory config, skipping save");
            return Ok(());
        };
        debug!("Saving config to: {:?}", config_path);

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)
                    .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
                info!("Created config directory: {:?}", config_dir);
            }
        }

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_initialized_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert!(config.organization.is_empty());
        assert!(config.workspace.is_empty());
        assert!(config.workspace_show_vars);
    }

    #[test]
    fn test_selection_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::load_from(&path).unwrap();
        config.organization = "acme".to_string();
        config.workspace = "networking-prod".to_string();
        config.workspace_show_vars = false;
        config.save().unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.organization, "acme");
        assert_eq!(reloaded.workspace, "networking-prod");
        assert!(!reloaded.workspace_show_vars);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "organization = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn test_in_memory_save_is_noop() {
        let mut config = Config::in_memory();
        config.organization = "acme".to_string();
        assert!(config.save().is_ok());
        assert!(config.path().is_none());
    }
}
