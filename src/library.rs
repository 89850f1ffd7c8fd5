//! Track catalog: directory scanning, display helpers and the in-memory
//! catalog with persisted likes and playlists.
//!
//! The catalog plays the role of the track, album, artist and playlist
//! services: the playback controller only ever sees the `Track` values
//! handed out from here.

mod catalog;
mod display;
mod group;
mod likes;
mod model;
mod playlists;
mod scan;
mod store;

pub use catalog::Catalog;
pub use display::{display_from_fields, format_duration, format_time};
pub use likes::{LikeStore, default_likes_path};
pub use model::{Album, Artist, Playlist, PlaylistUpdate, Track};
pub use playlists::{PlaylistStore, default_playlists_path};
pub use scan::scan;

#[cfg(test)]
mod tests;
