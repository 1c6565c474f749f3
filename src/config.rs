use anyhow::{anyhow, Context, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::content::Portfolio;
use crate::relay::DEFAULT_FORM_ENDPOINT;

const PROFILE_FILE: &str = "profile.json";
const LOG_FILE: &str = "folio.log";

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "folio")
}

pub fn default_profile_path() -> PathBuf {
    // Use XDG config directory or fallback
    match project_dirs() {
        Some(dirs) => dirs.config_dir().join(PROFILE_FILE),
        None => PathBuf::from(PROFILE_FILE),
    }
}

pub fn default_log_path() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.data_dir().join(LOG_FILE),
        None => PathBuf::from(LOG_FILE),
    }
}

/// Opens the log file for appending, creating its directory first.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Profile file actually in use; `None` means the built-in content.
    pub profile_path: Option<PathBuf>,
    pub endpoint: String,
}

impl Settings {
    /// An explicit `--profile` must exist; the default location is optional.
    pub fn resolve(
        profile_flag: Option<&Path>,
        endpoint_flag: Option<&str>,
    ) -> Result<(Self, Portfolio)> {
        let profile_path = match profile_flag {
            Some(path) => {
                if !path.exists() {
                    return Err(anyhow!("Profile file not found: {}", path.display()));
                }
                Some(path.to_path_buf())
            }
            None => {
                let path = default_profile_path();
                path.exists().then_some(path)
            }
        };

        let portfolio = match &profile_path {
            Some(path) => {
                log::debug!("Loading profile from {}", path.display());
                Portfolio::load(path)?
            }
            None => Portfolio::builtin().clone(),
        };

        let endpoint = resolve_endpoint(endpoint_flag, &portfolio.form_endpoint);
        Ok((Self { profile_path, endpoint }, portfolio))
    }
}

/// Flag first, then the profile's endpoint, then the compiled-in default.
pub fn resolve_endpoint(flag: Option<&str>, from_profile: &str) -> String {
    flag.map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| Some(from_profile.trim()).filter(|s| !s.is_empty()))
        .unwrap_or(DEFAULT_FORM_ENDPOINT)
        .to_string()
}

/// Writes `portfolio` as a personalisable JSON template.
pub fn write_profile_template(path: &Path, portfolio: &Portfolio, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(anyhow!(
            "Profile already exists at {}. Use --force to overwrite.",
            path.display()
        ));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, portfolio.to_json()?)
        .with_context(|| format!("Failed to write profile to {}", path.display()))?;
    Ok(())
}
