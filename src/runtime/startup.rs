use std::path::Path;

use tracing::info;

use crate::config;
use crate::library::{
    Catalog, LikeStore, PlaylistStore, default_likes_path, default_playlists_path, scan,
};

/// Scan `dir` and build the catalog, wiring up the likes and playlist stores.
pub fn load_catalog(dir: &Path, settings: &config::Settings) -> Catalog {
    let tracks = scan(dir, &settings.library);

    let likes = match settings.library.likes_file.clone().or_else(default_likes_path) {
        Some(path) => LikeStore::at(path),
        None => LikeStore::in_memory(),
    };
    let playlists = match settings
        .library
        .playlists_file
        .clone()
        .or_else(default_playlists_path)
    {
        Some(path) => PlaylistStore::at(path),
        None => PlaylistStore::in_memory(),
    };
    info!(
        dir = %dir.display(),
        tracks = tracks.len(),
        likes = ?likes.path(),
        playlists = ?playlists.path(),
        "catalog loaded"
    );

    Catalog::new(tracks, likes).with_playlists(playlists)
}
