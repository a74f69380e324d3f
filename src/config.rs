use crate::errors::{ConfigError, Result, WechatError};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use wechat_api::{ApiConfig, TransportConfig};
use wechat_core::ApiFamily;
use wechat_utils::mask_secret;

/// Environment variable that overrides `[auth] access_token`
pub use wechat_api::ACCESS_TOKEN_ENV;

/// Configuration manager for the wechat CLI
#[derive(Debug, Clone)]
pub struct Config {
    config_path: PathBuf,
    data: ini::Ini,
}

impl Config {
    /// Create a new config instance backed by `~/.wechat/config.ini`
    pub fn new() -> Result<Self> {
        let config_dir = get_config_dir()?;
        Self::with_path(config_dir.join("config.ini"))
    }

    /// Create a config instance backed by an explicit file; the file need not exist yet
    pub fn with_path(config_path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = config_path.into();

        let data = if config_path.exists() {
            ini::Ini::load_from_file(&config_path)
                .map_err(|e| ConfigError::IniError(e.to_string()))?
        } else {
            ini::Ini::new()
        };

        Ok(Config { config_path, data })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Save the configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.config_path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)
                    .map_err(|e| ConfigError::DirectoryCreationFailed(e.to_string()))?;
            }
        }

        self.data
            .write_to_file(&self.config_path)
            .map_err(|e| ConfigError::IniError(e.to_string()))?;
        Ok(())
    }

    /// Get a configuration value
    pub fn get_value(&self, section: &str, key: &str) -> Result<Option<String>> {
        Ok(self
            .data
            .get_from(Some(section), key)
            .map(|s| s.to_string()))
    }

    /// Set a configuration value
    pub fn set_value(&mut self, section: &str, key: &str, value: &str) -> Result<()> {
        self.data.with_section(Some(section)).set(key, value);
        Ok(())
    }

    /// Remove a configuration value, returning the old one
    pub fn unset_value(&mut self, section: &str, key: &str) -> Result<Option<String>> {
        Ok(self
            .data
            .section_mut(Some(section))
            .and_then(|section_map| section_map.remove(key)))
    }

    /// Get access token, preferring the environment over the file
    pub fn get_access_token(&self) -> Result<Option<String>> {
        let from_env = std::env::var(ACCESS_TOKEN_ENV).ok();
        Ok(pick_access_token(from_env, self.get_value("auth", "access_token")?))
    }

    /// Set access token
    pub fn set_access_token(&mut self, access_token: &str) -> Result<()> {
        self.set_value("auth", "access_token", access_token)
    }

    /// Get the API family, defaulting to the official account platform
    pub fn get_family(&self) -> Result<ApiFamily> {
        match self.get_value("auth", "family")? {
            Some(name) => name.parse().map_err(|_| {
                ConfigError::InvalidValue {
                    field: "auth.family".to_string(),
                    value: name,
                }
                .into()
            }),
            None => Ok(ApiFamily::default()),
        }
    }

    /// Build transport settings from the `[http]` section
    pub fn get_http_settings(&self) -> Result<TransportConfig> {
        let mut settings = TransportConfig::default();

        if let Some(raw) = self.get_value("http", "timeout_secs")? {
            let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                field: "http.timeout_secs".to_string(),
                value: raw.clone(),
            })?;
            settings.timeout = Duration::from_secs(secs);
        }

        if let Some(user_agent) = self.get_value("http", "user_agent")? {
            settings.user_agent = user_agent;
        }

        Ok(settings)
    }

    /// Show all configuration as a formatted string, with the access token masked
    pub fn show_config(&self) -> String {
        let mut output = String::new();

        for (section_name, section) in self.data.iter() {
            if let Some(section_name) = section_name {
                output.push_str(&format!("[{}]\n", section_name));
            }

            for (key, value) in section.iter() {
                if section_name == Some("auth") && key == "access_token" {
                    output.push_str(&format!("{} = {}\n", key, mask_secret(value)));
                } else {
                    output.push_str(&format!("{} = {}\n", key, value));
                }
            }
            output.push('\n');
        }

        output
    }
}

impl ApiConfig for Config {
    type Error = WechatError;

    fn get_access_token(&self) -> Result<String> {
        Config::get_access_token(self)?.ok_or_else(|| {
            ConfigError::MissingField(format!(
                "auth.access_token (or set {})",
                ACCESS_TOKEN_ENV
            ))
            .into()
        })
    }

    fn get_api_family(&self) -> Result<ApiFamily> {
        self.get_family()
    }

    fn get_transport_config(&self) -> Result<TransportConfig> {
        self.get_http_settings()
    }
}

/// Split a dotted `section.key` into its parts
pub fn parse_key(dotted: &str) -> Result<(&str, &str)> {
    match dotted.split_once('.') {
        Some((section, key)) if !section.is_empty() && !key.is_empty() => Ok((section, key)),
        _ => Err(ConfigError::InvalidKey(dotted.to_string()).into()),
    }
}

/// Get configuration directory path
fn get_config_dir() -> Result<PathBuf> {
    let home_dir = home::home_dir().ok_or_else(|| {
        ConfigError::DirectoryCreationFailed("Could not find home directory".to_string())
    })?;

    Ok(home_dir.join(".wechat"))
}

fn pick_access_token(from_env: Option<String>, from_file: Option<String>) -> Option<String> {
    from_env
        .filter(|token| !token.is_empty())
        .or(from_file)
        .filter(|token| !token.is_empty())
}
