//! TOML-based settings persistence for the daemon.
//!
//! Reads and writes [`Settings`] to the platform-appropriate settings file:
//! - Windows:  `%APPDATA%\tabletd\settings.toml`
//! - Linux:    `~/.config/tabletd/settings.toml`
//! - macOS:    `~/Library/Application Support/tabletd/settings.toml`
//!
//! A missing file is not an error — the daemon simply starts with nothing
//! applied — but a file that exists and fails to parse is reported, so a
//! typo in a hand-edited settings file never silently reverts the user to
//! defaults.

use std::path::{Path, PathBuf};

use tablet_core::Settings;
use thiserror::Error;
use tracing::info;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be serialized to TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Determines the platform-appropriate directory for daemon files.
///
/// # Errors
///
/// Returns [`StorageError::NoPlatformConfigDir`] when the platform config
/// base directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, StorageError> {
    platform_config_dir().ok_or(StorageError::NoPlatformConfigDir)
}

/// Resolves the full path to the settings file.
pub fn settings_file_path() -> Result<PathBuf, StorageError> {
    Ok(config_dir()?.join("settings.toml"))
}

/// Loads [`Settings`] from the platform settings file.
///
/// Returns `Ok(None)` when no file exists yet (first run).
///
/// # Errors
///
/// Returns [`StorageError::Io`] for file-system errors other than
/// "not found", and [`StorageError::Parse`] if the TOML is malformed.
pub fn load_settings() -> Result<Option<Settings>, StorageError> {
    load_settings_from(&settings_file_path()?)
}

/// Loads [`Settings`] from an explicit path.
pub fn load_settings_from(path: &Path) -> Result<Option<Settings>, StorageError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let settings: Settings = toml::from_str(&content)?;
            info!(path = %path.display(), "settings loaded");
            Ok(Some(settings))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StorageError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Persists `settings` to the platform settings file.
///
/// Creates the config directory if it does not exist.
pub fn save_settings(settings: &Settings) -> Result<(), StorageError> {
    save_settings_to(&settings_file_path()?, settings)
}

/// Persists `settings` to an explicit path.
pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<(), StorageError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| StorageError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "settings saved");
    Ok(())
}

/// Resolves the platform config base directory including the `tabletd`
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("tabletd"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("tabletd"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("tabletd")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}
