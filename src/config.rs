// Config store: a single JSON file with the service endpoint and the
// bearer token returned by `auth`.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Persisted session settings.
///
/// The service URL is stored under the `services` key so files written by
/// earlier releases keep loading.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(rename = "services", alias = "service", default)]
    pub service: String,
    #[serde(default)]
    pub token: String,
}

/// `~/.bifrost/config.json`, or `./.bifrost/config.json` when no home
/// directory can be determined.
pub fn default_config_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(".bifrost").join("config.json")
}

/// Read the config at `path`, writing an empty one first if the file does
/// not exist yet.
pub fn load(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("No config at {}, creating defaults", path.display());
        save(path, &Config::default())?;
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = serde_json::from_str(&data)
        .with_context(|| format!("Config file {} is not valid JSON", path.display()))?;
    Ok(config)
}

/// Write `config` to `path` via a temp file and rename, so a failed write
/// never leaves a truncated config behind.
pub fn save(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }
    }

    let data = serde_json::to_vec(config).context("Serializing config")?;
    let tmp = path.with_extension("json.tmp");
    // A leftover temp file would keep its old mode.
    match fs::remove_file(&tmp) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => {
            return Err(e).with_context(|| format!("Failed to remove {}", tmp.display()));
        }
        _ => {}
    }
    create_private(&tmp)
        .and_then(|mut file| {
            file.write_all(&data)?;
            file.sync_all()
        })
        .with_context(|| format!("Failed to write config file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace config file {}", path.display()))?;

    info!("Saved config to {}", path.display());
    Ok(())
}

// The file holds a bearer token, so it is owner-only from creation.
#[cfg(unix)]
fn create_private(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}
