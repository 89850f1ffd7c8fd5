//! Persistence of liked tracks.
//!
//! Likes are keyed by media URL rather than track id, since ids are assigned
//! per scan.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

use super::store::{data_file, read_toml, write_toml};

#[derive(Debug, Default, Serialize, Deserialize)]
struct LikesFile {
    #[serde(default)]
    liked: Vec<String>,
}

/// Where liked media URLs are stored. `None` keeps likes in memory only.
#[derive(Debug, Clone, Default)]
pub struct LikeStore {
    path: Option<PathBuf>,
}

impl LikeStore {
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

    /// Read the liked set. A missing file is an empty set.
    pub fn load(&self) -> Result<BTreeSet<String>, CatalogError> {
        let Some(path) = &self.path else {
            return Ok(BTreeSet::new());
        };
        let file: LikesFile = read_toml(path)?;
        Ok(file.liked.into_iter().collect())
    }

    pub fn save(&self, liked: &BTreeSet<String>) -> Result<(), CatalogError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let file = LikesFile {
            liked: liked.iter().cloned().collect(),
        };
        write_toml(path, &file)
    }
}

/// `$XDG_DATA_HOME/cadenza/likes.toml`, falling back to
/// `~/.local/share/cadenza/likes.toml`.
pub fn default_likes_path() -> Option<PathBuf> {
    data_file("likes.toml")
}
