use std::collections::BTreeSet;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, warn};

use crate::error::CatalogError;

use super::group::{group_albums, group_artists};
use super::likes::LikeStore;
use super::model::{Album, Artist, Playlist, PlaylistUpdate, Track};
use super::playlists::PlaylistStore;

const DEFAULT_PLAYLIST_NAME: &str = "New Playlist";

/// In-memory track catalog with persisted likes and playlists.
///
/// Albums and artists are derived from the tracks once, at construction.
pub struct Catalog {
    tracks: Vec<Track>,
    albums: Vec<Album>,
    artists: Vec<Artist>,
    liked: BTreeSet<String>,
    store: LikeStore,
    playlists: Vec<Playlist>,
    playlist_store: PlaylistStore,
}

impl Catalog {
    /// Build a catalog from scanned `tracks`, applying the likes found in `store`.
    ///
    /// An unreadable likes file is logged and treated as empty.
    pub fn new(mut tracks: Vec<Track>, store: LikeStore) -> Self {
        let liked = store.load().unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable likes file");
            BTreeSet::new()
        });
        for t in &mut tracks {
            t.is_liked = liked.contains(&t.audio_url);
        }
        let albums = group_albums(&tracks);
        let artists = group_artists(&tracks, &albums);
        Self {
            tracks,
            albums,
            artists,
            liked,
            store,
            playlists: Vec::new(),
            playlist_store: PlaylistStore::in_memory(),
        }
    }

    /// Attach a playlist store and load its playlists.
    ///
    /// An unreadable playlists file is logged and treated as empty.
    pub fn with_playlists(mut self, store: PlaylistStore) -> Self {
        self.playlists = store.load().unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable playlists file");
            Vec::new()
        });
        self.playlist_store = store;
        self
    }

    pub fn all(&self) -> &[Track] {
        &self.tracks
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get_by_id(&self, id: u64) -> Result<&Track, CatalogError> {
        self.tracks
            .iter()
            .find(|t| t.id == id)
            .ok_or(CatalogError::TrackNotFound(id))
    }

    /// Tracks whose id is in `ids`, in catalog order. Unknown ids are skipped.
    pub fn get_by_ids(&self, ids: &[u64]) -> Vec<Track> {
        self.tracks
            .iter()
            .filter(|t| ids.contains(&t.id))
            .cloned()
            .collect()
    }

    /// Positions of the tracks matching `query` (case-insensitive substring of
    /// title, artist or album). A blank query matches nothing.
    pub fn search_indices(&self, query: &str) -> Vec<usize> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| {
                t.title.to_lowercase().contains(&needle)
                    || t.artist.to_lowercase().contains(&needle)
                    || t.album.to_lowercase().contains(&needle)
            })
            .map(|(i, _)| i)
            .collect()
    }

    pub fn search(&self, query: &str) -> Vec<Track> {
        self.search_indices(query)
            .into_iter()
            .map(|i| self.tracks[i].clone())
            .collect()
    }

    pub fn liked_indices(&self) -> Vec<usize> {
        self.tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_liked)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn liked(&self) -> Vec<Track> {
        self.tracks.iter().filter(|t| t.is_liked).cloned().collect()
    }

    /// Whether the track at `audio_url` is liked.
    pub fn is_liked(&self, audio_url: &str) -> bool {
        self.liked.contains(audio_url)
    }

    /// Flip the liked flag of track `id` and persist the liked set.
    ///
    /// If persisting fails the flag is restored and the error returned.
    pub fn toggle_like(&mut self, id: u64) -> Result<Track, CatalogError> {
        let pos = self
            .tracks
            .iter()
            .position(|t| t.id == id)
            .ok_or(CatalogError::TrackNotFound(id))?;

        let url = self.tracks[pos].audio_url.clone();
        let now_liked = !self.tracks[pos].is_liked;
        if now_liked {
            self.liked.insert(url.clone());
        } else {
            self.liked.remove(&url);
        }

        if let Err(e) = self.store.save(&self.liked) {
            if now_liked {
                self.liked.remove(&url);
            } else {
                self.liked.insert(url);
            }
            return Err(e);
        }

        self.tracks[pos].is_liked = now_liked;
        info!(id, liked = now_liked, "like toggled");
        Ok(self.tracks[pos].clone())
    }

    fn track_indices(&self, ids: &[u64]) -> Vec<usize> {
        ids.iter()
            .filter_map(|id| self.tracks.iter().position(|t| t.id == *id))
            .collect()
    }

    fn tracks_at(&self, indices: Vec<usize>) -> Vec<Track> {
        indices.into_iter().map(|i| self.tracks[i].clone()).collect()
    }

    // Albums.

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn album(&self, id: u64) -> Result<&Album, CatalogError> {
        self.albums
            .iter()
            .find(|a| a.id == id)
            .ok_or(CatalogError::AlbumNotFound(id))
    }

    pub fn album_indices(&self, id: u64) -> Result<Vec<usize>, CatalogError> {
        Ok(self.track_indices(&self.album(id)?.track_ids))
    }

    pub fn album_tracks(&self, id: u64) -> Result<Vec<Track>, CatalogError> {
        Ok(self.tracks_at(self.album_indices(id)?))
    }

    /// Albums whose artist contains `name`, case-insensitively.
    pub fn albums_by_artist(&self, name: &str) -> Vec<&Album> {
        let needle = name.to_lowercase();
        self.albums
            .iter()
            .filter(|a| a.artist.to_lowercase().contains(&needle))
            .collect()
    }

    /// Albums whose title or artist contains `query`. A blank query matches nothing.
    pub fn search_albums(&self, query: &str) -> Vec<&Album> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.albums
            .iter()
            .filter(|a| {
                a.title.to_lowercase().contains(&needle) || a.artist.to_lowercase().contains(&needle)
            })
            .collect()
    }

    // Artists.

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn artist(&self, id: u64) -> Result<&Artist, CatalogError> {
        self.artists
            .iter()
            .find(|a| a.id == id)
            .ok_or(CatalogError::ArtistNotFound(id))
    }

    pub fn artist_indices(&self, id: u64) -> Result<Vec<usize>, CatalogError> {
        Ok(self.track_indices(&self.artist(id)?.track_ids))
    }

    pub fn artist_tracks(&self, id: u64) -> Result<Vec<Track>, CatalogError> {
        Ok(self.tracks_at(self.artist_indices(id)?))
    }

    pub fn artist_albums(&self, id: u64) -> Result<Vec<&Album>, CatalogError> {
        let artist = self.artist(id)?;
        Ok(self
            .albums
            .iter()
            .filter(|a| artist.album_ids.contains(&a.id))
            .collect())
    }

    /// Artists whose name contains `query`. A blank query matches nothing.
    pub fn search_artists(&self, query: &str) -> Vec<&Artist> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.artists
            .iter()
            .filter(|a| a.name.to_lowercase().contains(&needle))
            .collect()
    }

    // Playlists.

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn playlist(&self, id: u64) -> Result<&Playlist, CatalogError> {
        self.playlists
            .iter()
            .find(|p| p.id == id)
            .ok_or(CatalogError::PlaylistNotFound(id))
    }

    /// Catalog positions of the playlist's entries, in playlist order.
    /// Entries whose file is no longer in the library are skipped.
    pub fn playlist_indices(&self, id: u64) -> Result<Vec<usize>, CatalogError> {
        let playlist = self.playlist(id)?;
        Ok(playlist
            .tracks
            .iter()
            .filter_map(|url| self.tracks.iter().position(|t| &t.audio_url == url))
            .collect())
    }

    pub fn playlist_tracks(&self, id: u64) -> Result<Vec<Track>, CatalogError> {
        Ok(self.tracks_at(self.playlist_indices(id)?))
    }

    /// Total length of the playlist's tracks still in the library.
    pub fn playlist_duration(&self, id: u64) -> Result<u64, CatalogError> {
        Ok(self
            .playlist_indices(id)?
            .into_iter()
            .map(|i| self.tracks[i].duration_secs)
            .sum())
    }

    /// Create an empty playlist. A blank name becomes "New Playlist".
    pub fn create_playlist(&mut self, name: &str, description: &str) -> Result<Playlist, CatalogError> {
        let id = self.playlists.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let name = name.trim();
        let playlist = Playlist {
            id,
            name: if name.is_empty() {
                DEFAULT_PLAYLIST_NAME.to_string()
            } else {
                name.to_string()
            },
            description: description.trim().to_string(),
            created_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_secs()),
            tracks: Vec::new(),
        };

        self.edit_playlists(|playlists| {
            playlists.push(playlist.clone());
            Ok(())
        })?;
        info!(id, name = %playlist.name, "playlist created");
        Ok(playlist)
    }

    pub fn update_playlist(&mut self, id: u64, update: PlaylistUpdate) -> Result<Playlist, CatalogError> {
        self.edit_playlist(id, |p| {
            if let Some(name) = update.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
                p.name = name.to_string();
            }
            if let Some(description) = update.description {
                p.description = description.trim().to_string();
            }
            Ok(())
        })
    }

    pub fn delete_playlist(&mut self, id: u64) -> Result<Playlist, CatalogError> {
        let pos = self
            .playlists
            .iter()
            .position(|p| p.id == id)
            .ok_or(CatalogError::PlaylistNotFound(id))?;
        let mut removed = None;
        self.edit_playlists(|playlists| {
            removed = Some(playlists.remove(pos));
            Ok(())
        })?;
        info!(id, "playlist deleted");
        removed.ok_or(CatalogError::PlaylistNotFound(id))
    }

    /// Append track `track_id`. A track already in the playlist is not added twice.
    pub fn add_to_playlist(&mut self, id: u64, track_id: u64) -> Result<Playlist, CatalogError> {
        let url = self.get_by_id(track_id)?.audio_url.clone();
        self.edit_playlist(id, |p| {
            if !p.tracks.contains(&url) {
                p.tracks.push(url);
            }
            Ok(())
        })
    }

    /// Drop track `track_id`. A track not in the playlist is ignored.
    pub fn remove_from_playlist(&mut self, id: u64, track_id: u64) -> Result<Playlist, CatalogError> {
        let url = self.get_by_id(track_id)?.audio_url.clone();
        self.edit_playlist(id, |p| {
            p.tracks.retain(|u| *u != url);
            Ok(())
        })
    }

    /// Replace the playlist's order with `track_ids`.
    pub fn reorder_playlist(&mut self, id: u64, track_ids: &[u64]) -> Result<Playlist, CatalogError> {
        let urls = track_ids
            .iter()
            .map(|tid| self.get_by_id(*tid).map(|t| t.audio_url.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        self.edit_playlist(id, |p| {
            p.tracks = urls;
            Ok(())
        })
    }

    fn edit_playlist(
        &mut self,
        id: u64,
        edit: impl FnOnce(&mut Playlist) -> Result<(), CatalogError>,
    ) -> Result<Playlist, CatalogError> {
        self.edit_playlists(|playlists| {
            let playlist = playlists
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(CatalogError::PlaylistNotFound(id))?;
            edit(playlist)
        })?;
        self.playlist(id).cloned()
    }

    /// Apply `edit` and persist. On any failure the previous playlists are restored.
    fn edit_playlists(
        &mut self,
        edit: impl FnOnce(&mut Vec<Playlist>) -> Result<(), CatalogError>,
    ) -> Result<(), CatalogError> {
        let previous = self.playlists.clone();
        let result = edit(&mut self.playlists).and_then(|()| self.playlist_store.save(&self.playlists));
        if result.is_err() {
            self.playlists = previous;
        }
        result
    }
}
