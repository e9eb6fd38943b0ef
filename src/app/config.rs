//! Settings file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::settings::SETTINGS_FILE;
use crate::domain::{AppError, Settings};

/// Settings together with the directory their relative paths resolve against.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub base_dir: PathBuf,
}

/// Load settings from `explicit`, or from `preflight.toml` in `cwd` when present.
///
/// An explicit path that does not exist is an error; a missing default file is not.
pub fn load_settings(explicit: Option<&Path>, cwd: &Path) -> Result<LoadedSettings, AppError> {
    let path = match explicit {
        Some(path) => cwd.join(path),
        None => {
            let candidate = cwd.join(SETTINGS_FILE);
            if !candidate.is_file() {
                tracing::debug!(cwd = %cwd.display(), "no settings file, using defaults");
                return Ok(LoadedSettings { settings: Settings::default(), base_dir: cwd.to_path_buf() });
            }
            candidate
        }
    };

    let content = fs::read_to_string(&path).map_err(|source| AppError::ReadInput {
        path: path.display().to_string(),
        source,
    })?;
    let settings = Settings::parse_toml(&content).map_err(|err| AppError::Settings {
        path: path.display().to_string(),
        details: err.to_string(),
    })?;
    tracing::debug!(path = %path.display(), "loaded settings");

    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.to_path_buf());
    Ok(LoadedSettings { settings, base_dir })
}
