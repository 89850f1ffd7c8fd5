//! Error types shared across the player.
//!
//! Nothing here is fatal to the process: media errors degrade to "playback
//! stopped" and catalog errors are surfaced to the user as notices.

use thiserror::Error;

/// Failures reported by a media resource.
#[derive(Error, Debug)]
pub enum MediaError {
    /// The audio output device could not be opened.
    #[error("audio output unavailable: {0}")]
    Output(String),

    /// The media URL uses a scheme this player cannot open.
    #[error("unsupported media url: {0}")]
    UnsupportedUrl(String),

    /// The media file could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The media file could not be decoded.
    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    /// Seeking inside the loaded media failed.
    #[error("seek failed: {0}")]
    Seek(String),

    /// `play` was invoked with nothing loaded.
    #[error("no media loaded")]
    NothingLoaded,
}

/// Failures from the track catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Track with ID {0} not found")]
    TrackNotFound(u64),

    #[error("Album with ID {0} not found")]
    AlbumNotFound(u64),

    #[error("Artist with ID {0} not found")]
    ArtistNotFound(u64),

    #[error("Playlist with ID {0} not found")]
    PlaylistNotFound(u64),

    #[error("library file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("library file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to encode library file: {0}")]
    Encode(#[from] toml::ser::Error),
}
