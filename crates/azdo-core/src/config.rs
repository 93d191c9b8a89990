//! Configuration management for azdo-tools.
//!
//! Configuration comes from a TOML file in the platform config directory,
//! overridden by environment variables:
//!
//! - **macOS/Linux**: `~/.config/azdo-tools/config.toml`
//! - **Windows**: `%APPDATA%\azdo-tools\config.toml`
//!
//! | Variable              | Overrides                    |
//! |-----------------------|------------------------------|
//! | `DEVOPS_ORGANIZATION` | `azure_devops.organization`  |
//! | `DEVOPS_PROJECT`      | `azure_devops.project`       |
//! | `DEVOPS_BASE_URL`     | `azure_devops.base_url`      |
//!
//! The personal access token (`DEVOPS_PAT`) is never written to this file;
//! see `azdo-storage` for how it is resolved.
//!
//! # Example
//!
//! ```ignore
//! use azdo_core::config::Config;
//!
//! let config = Config::resolve()?;
//! let devops = config.validate()?;
//! println!("{}/{}", devops.organization, devops.project);
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config directory name.
const CONFIG_DIR_NAME: &str = "azdo-tools";

/// Default Azure DevOps Services URL.
pub const DEFAULT_BASE_URL: &str = "https://dev.azure.com";

/// REST API version sent with every request.
pub const DEFAULT_API_VERSION: &str = "7.1";

/// HTTP timeout applied to every request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_ORGANIZATION: &str = "DEVOPS_ORGANIZATION";
pub const ENV_PROJECT: &str = "DEVOPS_PROJECT";
pub const ENV_BASE_URL: &str = "DEVOPS_BASE_URL";
pub const ENV_PAT: &str = "DEVOPS_PAT";

// =============================================================================
// Configuration structures
// =============================================================================

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Azure DevOps connection settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_devops: Option<AzureDevOpsConfig>,

    /// Output shaping settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Azure DevOps connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureDevOpsConfig {
    /// Organization name (`https://dev.azure.com/{organization}`)
    pub organization: String,
    /// Project name or ID
    pub project: String,
    /// Base URL (for Azure DevOps Server instances)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// REST API version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    /// HTTP timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl AzureDevOpsConfig {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

/// Limits applied when shaping tool output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Lines of each log shown by the build logs preview
    pub log_preview_lines: usize,
    /// Trailing lines of each failed task log included in diagnostics
    pub failed_log_tail_lines: usize,
    /// Maximum characters of a rendered file diff
    pub max_diff_chars: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_preview_lines: 10,
            failed_log_tail_lines: 200,
            max_diff_chars: 20_000,
        }
    }
}

fn empty_devops_config() -> AzureDevOpsConfig {
    AzureDevOpsConfig {
        organization: String::new(),
        project: String::new(),
        base_url: None,
        api_version: None,
        timeout_secs: None,
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid number for '{}': {}", key, value)))
}

// =============================================================================
// Config implementation
// =============================================================================

impl Config {
    /// Platform config directory for azdo-tools.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(CONFIG_DIR_NAME))
            .ok_or_else(|| Error::Config("No platform config directory available".to_string()))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load the config file, then apply environment overrides.
    pub fn resolve() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Read the config file at `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Invalid TOML in {}: {}", path.display(), e))
        })?;

        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Write the config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Cannot create {}: {}", parent.display(), e))
            })?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Cannot serialize config: {}", e)))?;
        std::fs::write(path, contents).map_err(|e| {
            Error::Config(format!("Cannot write {}: {}", path.display(), e))
        })?;

        info!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Apply environment overrides using the given lookup.
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let organization = get(ENV_ORGANIZATION);
        let project = get(ENV_PROJECT);
        let base_url = get(ENV_BASE_URL);

        if organization.is_none() && project.is_none() && base_url.is_none() {
            return;
        }

        let devops = self.azure_devops.get_or_insert_with(empty_devops_config);
        if let Some(organization) = organization {
            debug!(var = ENV_ORGANIZATION, "Organization overridden from environment");
            devops.organization = organization;
        }
        if let Some(project) = project {
            debug!(var = ENV_PROJECT, "Project overridden from environment");
            devops.project = project;
        }
        if let Some(base_url) = base_url {
            debug!(var = ENV_BASE_URL, "Base URL overridden from environment");
            devops.base_url = Some(base_url);
        }
    }

    /// Return the Azure DevOps settings, failing if organization or project
    /// is missing.
    pub fn validate(&self) -> Result<&AzureDevOpsConfig> {
        let devops = self.azure_devops.as_ref().ok_or_else(|| {
            Error::Config(format!(
                "Azure DevOps is not configured. Set {} and {} or run `azdo-tools config set`",
                ENV_ORGANIZATION, ENV_PROJECT
            ))
        })?;

        if devops.organization.trim().is_empty() {
            return Err(Error::Config(format!(
                "Missing organization (set {} or azure_devops.organization)",
                ENV_ORGANIZATION
            )));
        }
        if devops.project.trim().is_empty() {
            return Err(Error::Config(format!(
                "Missing project (set {} or azure_devops.project)",
                ENV_PROJECT
            )));
        }

        Ok(devops)
    }

    /// Set a configuration value by key path.
    ///
    /// Key format: `section.field` (e.g., `azure_devops.organization`,
    /// `output.log_preview_lines`)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let (section, field) = split_key(key)?;

        match section {
            "azure_devops" | "devops" => {
                let config = self.azure_devops.get_or_insert_with(empty_devops_config);
                match field {
                    "organization" | "org" => config.organization = value.to_string(),
                    "project" => config.project = value.to_string(),
                    "base_url" | "url" => config.base_url = Some(value.to_string()),
                    "api_version" => config.api_version = Some(value.to_string()),
                    "timeout_secs" | "timeout" => {
                        config.timeout_secs = Some(parse_number(key, value)?)
                    }
                    _ => {
                        return Err(Error::Config(format!(
                            "Unknown azure_devops config field: {}",
                            field
                        )))
                    }
                }
            }
            "output" => match field {
                "log_preview_lines" => self.output.log_preview_lines = parse_number(key, value)?,
                "failed_log_tail_lines" => {
                    self.output.failed_log_tail_lines = parse_number(key, value)?
                }
                "max_diff_chars" => self.output.max_diff_chars = parse_number(key, value)?,
                _ => {
                    return Err(Error::Config(format!(
                        "Unknown output config field: {}",
                        field
                    )))
                }
            },
            _ => {
                return Err(Error::Config(format!("Unknown config section: {}", section)));
            }
        }

        Ok(())
    }

    /// Get a configuration value by key path.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let (section, field) = split_key(key)?;

        match section {
            "azure_devops" | "devops" => {
                let Some(config) = &self.azure_devops else {
                    return Ok(None);
                };
                match field {
                    "organization" | "org" => Ok(Some(config.organization.clone())),
                    "project" => Ok(Some(config.project.clone())),
                    "base_url" | "url" => Ok(config.base_url.clone()),
                    "api_version" => Ok(config.api_version.clone()),
                    "timeout_secs" | "timeout" => Ok(config.timeout_secs.map(|t| t.to_string())),
                    _ => Err(Error::Config(format!(
                        "Unknown azure_devops config field: {}",
                        field
                    ))),
                }
            }
            "output" => match field {
                "log_preview_lines" => Ok(Some(self.output.log_preview_lines.to_string())),
                "failed_log_tail_lines" => {
                    Ok(Some(self.output.failed_log_tail_lines.to_string()))
                }
                "max_diff_chars" => Ok(Some(self.output.max_diff_chars.to_string())),
                _ => Err(Error::Config(format!(
                    "Unknown output config field: {}",
                    field
                ))),
            },
            _ => Err(Error::Config(format!("Unknown config section: {}", section))),
        }
    }
}

fn split_key(key: &str) -> Result<(&str, &str)> {
    match key.split_once('.') {
        Some((section, field)) if !field.contains('.') && !section.is_empty() => {
            Ok((section, field))
        }
        _ => Err(Error::Config(format!(
            "Invalid config key '{}'. Expected format: section.field",
            key
        ))),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.azure_devops.is_none());
        assert_eq!(config.output.log_preview_lines, 10);
        assert_eq!(config.output.failed_log_tail_lines, 200);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_set_and_get() {
        let mut config = Config::default();

        config.set("azure_devops.organization", "contoso").unwrap();
        config.set("azure_devops.project", "Fabrikam").unwrap();
        config.set("devops.timeout", "90").unwrap();
        config.set("output.log_preview_lines", "25").unwrap();

        assert_eq!(
            config.get("azure_devops.organization").unwrap(),
            Some("contoso".to_string())
        );
        assert_eq!(
            config.get("azure_devops.project").unwrap(),
            Some("Fabrikam".to_string())
        );
        assert_eq!(
            config.get("azure_devops.timeout_secs").unwrap(),
            Some("90".to_string())
        );
        assert_eq!(config.get("azure_devops.base_url").unwrap(), None);
        assert_eq!(config.output.log_preview_lines, 25);

        let devops = config.validate().unwrap();
        assert_eq!(devops.base_url(), DEFAULT_BASE_URL);
        assert_eq!(devops.api_version(), DEFAULT_API_VERSION);
        assert_eq!(devops.timeout_secs(), 90);
    }

    #[test]
    fn test_invalid_key() {
        let mut config = Config::default();

        assert!(config.set("invalid", "value").is_err());
        assert!(config.set("too.many.parts", "value").is_err());
        assert!(config.set("unknown.field", "value").is_err());
        assert!(config.set("output.log_preview_lines", "lots").is_err());

        // Section not configured yet
        assert_eq!(config.get("azure_devops.organization").unwrap(), None);

        config.set("azure_devops.organization", "contoso").unwrap();
        assert!(config.get("azure_devops.unknown_field").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env_overrides(env_from(&[
            (ENV_ORGANIZATION, "contoso"),
            (ENV_PROJECT, "Fabrikam"),
            (ENV_BASE_URL, "https://tfs.contoso.local/tfs"),
        ]));

        let devops = config.validate().unwrap();
        assert_eq!(devops.organization, "contoso");
        assert_eq!(devops.project, "Fabrikam");
        assert_eq!(devops.base_url(), "https://tfs.contoso.local/tfs");
    }

    #[test]
    fn test_env_overrides_keep_file_values() {
        let mut config = Config::default();
        config.set("azure_devops.organization", "from-file").unwrap();
        config.set("azure_devops.project", "FileProject").unwrap();

        config.apply_env_overrides(env_from(&[
            (ENV_PROJECT, "EnvProject"),
            (ENV_ORGANIZATION, "  "),
        ]));

        let devops = config.validate().unwrap();
        assert_eq!(devops.organization, "from-file");
        assert_eq!(devops.project, "EnvProject");
    }

    #[test]
    fn test_validate_missing_project() {
        let mut config = Config::default();
        config.set("azure_devops.organization", "contoso").unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains(ENV_PROJECT));
    }

    #[test]
    fn test_save_and_load() {
        let mut config = Config::default();
        config.set("azure_devops.organization", "contoso").unwrap();
        config.set("azure_devops.project", "Fabrikam").unwrap();

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        config.save_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[azure_devops]"));
        assert!(contents.contains("organization = \"contoso\""));
        assert!(!contents.contains("base_url"));

        let loaded = Config::load_from(&path).unwrap();
        let devops = loaded.azure_devops.unwrap();
        assert_eq!(devops.organization, "contoso");
        assert_eq!(devops.project, "Fabrikam");
        assert_eq!(loaded.output, OutputConfig::default());
    }

    #[test]
    fn test_load_nonexistent() {
        let path = PathBuf::from("/nonexistent/path/config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(config.azure_devops.is_none());
    }

    #[test]
    fn test_partial_output_section() {
        let config: Config = toml::from_str(
            r#"
            [output]
            failed_log_tail_lines = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.output.failed_log_tail_lines, 50);
        assert_eq!(config.output.log_preview_lines, 10);
    }
}
