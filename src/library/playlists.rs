//! Persistence of playlists, stored as `[[playlist]]` tables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

use super::model::Playlist;
use super::store::{data_file, read_toml, write_toml};

#[derive(Debug, Default, Serialize, Deserialize)]
struct PlaylistsFile {
    #[serde(default, rename = "playlist")]
    playlists: Vec<Playlist>,
}

/// Where playlists are stored. `None` keeps them in memory only.
#[derive(Debug, Clone, Default)]
pub struct PlaylistStore {
    path: Option<PathBuf>,
}

impl PlaylistStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn in_memory() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read all playlists. A missing file means no playlists.
    pub fn load(&self) -> Result<Vec<Playlist>, CatalogError> {
        let Some(path) = &self.path else {
            return Ok(Vec::new());
        };
        let file: PlaylistsFile = read_toml(path)?;
        Ok(file.playlists)
    }

    pub fn save(&self, playlists: &[Playlist]) -> Result<(), CatalogError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let file = PlaylistsFile {
            playlists: playlists.to_vec(),
        };
        write_toml(path, &file)
    }
}

/// `playlists.toml` next to the likes file.
pub fn default_playlists_path() -> Option<PathBuf> {
    data_file("playlists.toml")
}
