use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use url::Url;

/// Client configuration persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DriveConfig {
    /// Base URL of the drive API, e.g. "https://example.com/api".
    #[serde(rename = "apiUrl")]
    pub api_url: Option<String>,
    /// Skip client-side image compression and upload files as selected.
    #[serde(rename = "keepOriginalUploading", default)]
    pub keep_original_uploading: bool,
}

impl DriveConfig {
    /// Parsed API base URL, if one is configured.
    pub fn api_url(&self) -> Result<Url> {
        let raw = self
            .api_url
            .as_deref()
            .ok_or_else(|| anyhow!("no API URL configured"))?;
        Ok(Url::parse(raw)?)
    }
}

pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(home_dir) = dirs::home_dir() {
        Ok(home_dir.join(".drive-uploader"))
    } else {
        Err(anyhow!("could not find home directory"))
    }
}

pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.json"))
}

pub fn get_logs_dir() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("logs"))
}

pub fn ensure_config_dir() -> Result<()> {
    ensure_private_dir(&get_config_dir()?)
}

pub fn ensure_logs_dir() -> Result<()> {
    ensure_private_dir(&get_logs_dir()?)
}

fn ensure_private_dir(dir: &PathBuf) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;

        // Owner-only on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = fs::metadata(dir)?;
            let mut permissions = metadata.permissions();
            permissions.set_mode(0o700);
            fs::set_permissions(dir, permissions)?;
        }
    }
    Ok(())
}

pub fn load_config() -> Result<DriveConfig> {
    ensure_config_dir()?;

    let config_file = get_config_file_path()?;

    if config_file.exists() {
        let content = fs::read_to_string(config_file)?;
        let config: DriveConfig = serde_json::from_str(&content)?;
        Ok(config)
    } else {
        Ok(DriveConfig::default())
    }
}

pub fn save_config(config: &DriveConfig) -> Result<()> {
    ensure_config_dir()?;

    let config_file = get_config_file_path()?;
    let content = serde_json::to_string_pretty(config)?;

    fs::write(&config_file, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = fs::metadata(&config_file)?;
        let mut permissions = metadata.permissions();
        permissions.set_mode(0o600);
        fs::set_permissions(&config_file, permissions)?;
    }

    Ok(())
}
