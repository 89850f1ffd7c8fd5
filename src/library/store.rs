//! TOML files under the user data directory.

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CatalogError;

/// `$XDG_DATA_HOME/cadenza/<name>`, falling back to
/// `~/.local/share/cadenza/<name>`.
pub(super) fn data_file(name: &str) -> Option<PathBuf> {
    let data_home = if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
    };

    data_home.map(|d| d.join("cadenza").join(name))
}

/// Read `path` as TOML. A missing file yields `T::default()`.
pub(super) fn read_toml<T: DeserializeOwned + Default>(path: &Path) -> Result<T, CatalogError> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(e.into()),
    };
    Ok(toml::from_str(&text)?)
}

/// Write `value` to `path` as TOML, creating parent directories.
pub(super) fn write_toml<T: Serialize>(path: &Path, value: &T) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string(value)?)?;
    Ok(())
}
