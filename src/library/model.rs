use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A playable track reference.
///
/// The playback controller treats this as opaque apart from `id`,
/// `audio_url` and `duration_secs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: u64,
    pub title: String,
    /// Empty when the file carries no artist tag.
    pub artist: String,
    /// Empty when the file carries no album tag.
    pub album: String,
    pub duration_secs: u64,
    /// A filesystem path or a `file://` URL.
    pub audio_url: String,
    #[serde(default)]
    pub is_liked: bool,
}

impl Track {
    /// Duration as reported by the tags, if any.
    pub fn duration(&self) -> Option<Duration> {
        (self.duration_secs > 0).then(|| Duration::from_secs(self.duration_secs))
    }
}

/// Tracks sharing an album tag and artist, grouped at scan time.
#[derive(Debug, Clone, PartialEq)]
pub struct Album {
    pub id: u64,
    pub title: String,
    pub artist: String,
    /// Member track ids, in catalog order.
    pub track_ids: Vec<u64>,
    pub duration_secs: u64,
}

/// Tracks sharing an artist tag, grouped at scan time.
#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    pub id: u64,
    pub name: String,
    pub album_ids: Vec<u64>,
    pub track_ids: Vec<u64>,
}

/// A user playlist.
///
/// Entries are media URLs, like likes, so a playlist survives a rescan that
/// renumbers track ids. Order is the playback order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Seconds since the Unix epoch.
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub tracks: Vec<String>,
}

/// Field changes for `Catalog::update_playlist`. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct PlaylistUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}
