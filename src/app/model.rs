//! Application model types: `App`, `View` and the helper rows they render.
//!
//! The `App` struct holds the catalog, the cursor, the filter and the last
//! player snapshot received from the audio thread. It never mutates playback
//! state itself; it only builds `AudioCmd`s.

use std::time::{Duration, Instant};

use crate::audio::{AudioCmd, Notice, PlayerState};
use crate::error::CatalogError;
use crate::library::{Catalog, PlaylistUpdate, Track, format_duration};

/// Which list the cursor moves in.
///
/// `Albums`, `Artists` and `Playlists` list collections; the views carrying
/// an id list the tracks of one collection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Library,
    Liked,
    Albums,
    Artists,
    Playlists,
    Queue,
    Album(u64),
    Artist(u64),
    Playlist(u64),
}

impl View {
    /// The next top-level view for `tab`.
    pub fn next(self) -> Self {
        match self {
            Self::Library => Self::Liked,
            Self::Liked => Self::Albums,
            Self::Albums | Self::Album(_) => Self::Artists,
            Self::Artists | Self::Artist(_) => Self::Playlists,
            Self::Playlists | Self::Playlist(_) => Self::Queue,
            Self::Queue => Self::Library,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Library => "Library",
            Self::Liked => "Liked Songs",
            Self::Albums => "Albums",
            Self::Artists => "Artists",
            Self::Playlists => "Playlists",
            Self::Queue => "Queue",
            Self::Album(_) => "Album",
            Self::Artist(_) => "Artist",
            Self::Playlist(_) => "Playlist",
        }
    }

    /// The collection list a detail view was opened from.
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::Album(_) => Some(Self::Albums),
            Self::Artist(_) => Some(Self::Artists),
            Self::Playlist(_) => Some(Self::Playlists),
            _ => None,
        }
    }

    pub fn lists_collections(self) -> bool {
        matches!(self, Self::Albums | Self::Artists | Self::Playlists)
    }
}

/// One row of a collection view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub id: u64,
    pub name: String,
    pub detail: String,
}

/// What a text prompt will do with its input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PromptKind {
    NewPlaylist,
    RenamePlaylist(u64),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub text: String,
}

/// The main application model.
pub struct App {
    pub catalog: Catalog,
    pub view: View,
    /// Position of the cursor within the visible list.
    pub selected: usize,
    pub filter_mode: bool,
    pub filter_query: String,
    pub prompt: Option<Prompt>,
    /// Playlist that `add_selection_to_playlist` appends to.
    pub target_playlist: Option<u64>,
    pub player: PlayerState,
    pub current_dir: Option<String>,
    notice: Option<(Notice, Instant)>,
}

impl App {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            view: View::Library,
            selected: 0,
            filter_mode: false,
            filter_query: String::new(),
            prompt: None,
            target_playlist: None,
            player: PlayerState::default(),
            current_dir: None,
            notice: None,
        }
    }

    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    /// Tracks shown in the current view, in display order.
    ///
    /// The library view honours the filter; the others don't. Collection
    /// views show no tracks.
    pub fn visible(&self) -> Vec<&Track> {
        let all = self.catalog.all();
        let indices = match self.view {
            View::Library if self.filter_query.trim().is_empty() => return all.iter().collect(),
            View::Library => self.catalog.search_indices(&self.filter_query),
            View::Liked => self.catalog.liked_indices(),
            View::Queue => return self.player.queue.iter().collect(),
            View::Album(id) => self.catalog.album_indices(id).unwrap_or_default(),
            View::Artist(id) => self.catalog.artist_indices(id).unwrap_or_default(),
            View::Playlist(id) => self.catalog.playlist_indices(id).unwrap_or_default(),
            View::Albums | View::Artists | View::Playlists => Vec::new(),
        };
        indices.into_iter().map(|i| &all[i]).collect()
    }

    /// Rows of a collection view. Empty for track views.
    pub fn entries(&self) -> Vec<Entry> {
        match self.view {
            View::Albums => self
                .catalog
                .albums()
                .iter()
                .map(|a| Entry {
                    id: a.id,
                    name: a.title.clone(),
                    detail: format!(
                        "{}, {} tracks, {}",
                        a.artist,
                        a.track_ids.len(),
                        format_duration(a.duration_secs)
                    ),
                })
                .collect(),
            View::Artists => self
                .catalog
                .artists()
                .iter()
                .map(|a| Entry {
                    id: a.id,
                    name: a.name.clone(),
                    detail: format!("{} albums, {} tracks", a.album_ids.len(), a.track_ids.len()),
                })
                .collect(),
            View::Playlists => self
                .catalog
                .playlists()
                .iter()
                .map(|p| Entry {
                    id: p.id,
                    name: p.name.clone(),
                    detail: format!(
                        "{} tracks, {}",
                        self.catalog.playlist_indices(p.id).map_or(0, |v| v.len()),
                        format_duration(self.catalog.playlist_duration(p.id).unwrap_or(0))
                    ),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Heading for the list pane.
    pub fn view_title(&self) -> String {
        let name = match self.view {
            View::Album(id) => self.catalog.album(id).ok().map(|a| a.title.clone()),
            View::Artist(id) => self.catalog.artist(id).ok().map(|a| a.name.clone()),
            View::Playlist(id) => self.catalog.playlist(id).ok().map(|p| p.name.clone()),
            _ => None,
        };
        match name {
            Some(name) => format!("{}: {name}", self.view.title()),
            None => self.view.title().to_string(),
        }
    }

    fn row_count(&self) -> usize {
        if self.view.lists_collections() {
            self.entries().len()
        } else {
            self.visible().len()
        }
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.visible().get(self.selected).copied()
    }

    pub fn selected_entry(&self) -> Option<Entry> {
        self.entries().into_iter().nth(self.selected)
    }

    /// Move the cursor down, wrapping to the top.
    pub fn next(&mut self) {
        let len = self.row_count();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn prev(&mut self) {
        let len = self.row_count();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.row_count().saturating_sub(1);
    }

    pub fn cycle_view(&mut self) {
        self.view = self.view.next();
        self.filter_mode = false;
        self.selected = match self.view {
            View::Queue => self.player.current_index.unwrap_or(0),
            _ => 0,
        };
        self.clamp_selection();
    }

    /// Open the collection under the cursor. Returns whether a view opened.
    pub fn open_selection(&mut self) -> bool {
        let Some(entry) = self.selected_entry() else {
            return false;
        };
        self.view = match self.view {
            View::Albums => View::Album(entry.id),
            View::Artists => View::Artist(entry.id),
            View::Playlists => {
                self.target_playlist = Some(entry.id);
                View::Playlist(entry.id)
            }
            _ => return false,
        };
        self.selected = 0;
        true
    }

    /// Return from a collection to its list, with the cursor on it.
    /// Returns whether the view changed.
    pub fn back(&mut self) -> bool {
        let (Some(parent), Some(id)) = (self.view.parent(), self.collection_id()) else {
            return false;
        };
        self.view = parent;
        self.selected = self
            .entries()
            .iter()
            .position(|e| e.id == id)
            .unwrap_or(0);
        true
    }

    fn collection_id(&self) -> Option<u64> {
        match self.view {
            View::Album(id) | View::Artist(id) | View::Playlist(id) => Some(id),
            _ => None,
        }
    }

    /// Enter filter mode: typed characters narrow the library view.
    pub fn enter_filter_mode(&mut self) {
        self.view = View::Library;
        self.filter_mode = true;
        self.clamp_selection();
    }

    /// Leave filter mode, keeping the current filter.
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    /// Clear the active filter and leave filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.clamp_selection();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.selected = 0;
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.selected = 0;
    }

    /// Take a fresh snapshot from the audio thread.
    ///
    /// Liked flags on the snapshot's track copies are refreshed from the
    /// catalog, which may have changed since the tracks were queued.
    pub fn sync_player(&mut self, state: PlayerState) {
        self.player = state;
        self.refresh_player_likes();
        if self.view == View::Queue {
            self.clamp_selection();
        }
    }

    fn refresh_player_likes(&mut self) {
        let catalog = &self.catalog;
        for t in self.player.queue.iter_mut().chain(self.player.current_track.as_mut()) {
            t.is_liked = catalog.is_liked(&t.audio_url);
        }
    }

    /// Command to play the selection, using the visible list as the queue.
    pub fn play_selection(&self) -> Option<AudioCmd> {
        let visible = self.visible();
        let track = visible.get(self.selected)?;
        Some(AudioCmd::PlayTrack {
            track: Some((*track).clone()),
            queue: visible.iter().map(|t| (*t).clone()).collect(),
            start_index: self.selected,
        })
    }

    /// Command to play the whole collection under the cursor from its first track.
    pub fn play_entry(&self) -> Option<AudioCmd> {
        let tracks = self.entry_tracks()?;
        let first = tracks.first()?.clone();
        Some(AudioCmd::PlayTrack {
            track: Some(first),
            queue: tracks,
            start_index: 0,
        })
    }

    fn entry_tracks(&self) -> Option<Vec<Track>> {
        let entry = self.selected_entry()?;
        let tracks = match self.view {
            View::Albums => self.catalog.album_tracks(entry.id),
            View::Artists => self.catalog.artist_tracks(entry.id),
            View::Playlists => self.catalog.playlist_tracks(entry.id),
            _ => return None,
        };
        tracks.ok()
    }

    /// Command to append the selection to the queue: the track under the
    /// cursor, or every track of the collection under it. Not offered in the
    /// queue view.
    pub fn queue_selection(&self) -> Option<AudioCmd> {
        if self.view == View::Queue {
            return None;
        }
        if self.view.lists_collections() {
            return self
                .entry_tracks()
                .filter(|t| !t.is_empty())
                .map(AudioCmd::AddToQueue);
        }
        let track = self.selected_track()?.clone();
        Some(AudioCmd::AddToQueue(vec![track]))
    }

    /// Command to drop the selected queue entry. Only offered in the queue view.
    pub fn remove_selection(&self) -> Option<AudioCmd> {
        if self.view != View::Queue || self.selected >= self.player.queue.len() {
            return None;
        }
        Some(AudioCmd::RemoveFromQueue(self.selected))
    }

    pub fn toggle_like_selected(&mut self) -> Result<Option<Track>, CatalogError> {
        let Some(id) = self.selected_track().map(|t| t.id) else {
            return Ok(None);
        };
        let track = self.catalog.toggle_like(id)?;
        self.refresh_player_likes();
        if self.view == View::Liked {
            self.clamp_selection();
        }
        Ok(Some(track))
    }

    /// Start naming a new playlist.
    pub fn start_new_playlist(&mut self) {
        self.prompt = Some(Prompt {
            kind: PromptKind::NewPlaylist,
            text: String::new(),
        });
    }

    /// Start renaming the playlist under the cursor or the open one.
    pub fn start_rename_playlist(&mut self) -> bool {
        let id = match self.view {
            View::Playlists => self.selected_entry().map(|e| e.id),
            View::Playlist(id) => Some(id),
            _ => None,
        };
        let Some(playlist) = id.and_then(|id| self.catalog.playlist(id).ok()) else {
            return false;
        };
        self.prompt = Some(Prompt {
            kind: PromptKind::RenamePlaylist(playlist.id),
            text: playlist.name.clone(),
        });
        true
    }

    pub fn push_prompt_char(&mut self, c: char) {
        if let Some(p) = &mut self.prompt {
            p.text.push(c);
        }
    }

    pub fn pop_prompt_char(&mut self) {
        if let Some(p) = &mut self.prompt {
            p.text.pop();
        }
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    /// Apply the prompt. A new playlist becomes the target for additions.
    pub fn submit_prompt(&mut self) -> Result<Option<Notice>, CatalogError> {
        let Some(prompt) = self.prompt.take() else {
            return Ok(None);
        };
        match prompt.kind {
            PromptKind::NewPlaylist => {
                let p = self.catalog.create_playlist(&prompt.text, "")?;
                self.target_playlist = Some(p.id);
                Ok(Some(Notice::success(format!("Created playlist \"{}\"", p.name))))
            }
            PromptKind::RenamePlaylist(id) => {
                let p = self.catalog.update_playlist(
                    id,
                    PlaylistUpdate {
                        name: Some(prompt.text),
                        description: None,
                    },
                )?;
                Ok(Some(Notice::success(format!("Renamed playlist to \"{}\"", p.name))))
            }
        }
    }

    /// Append the track under the cursor to the target playlist.
    pub fn add_selection_to_playlist(&mut self) -> Result<Option<Notice>, CatalogError> {
        let Some(track_id) = self.selected_track().map(|t| t.id) else {
            return Ok(None);
        };
        let Some(playlist_id) = self.target_playlist else {
            return Ok(Some(Notice::error("Open or create a playlist first")));
        };
        let p = self.catalog.add_to_playlist(playlist_id, track_id)?;
        Ok(Some(Notice::success(format!("Added to \"{}\"", p.name))))
    }

    /// Delete the playlist under the cursor, or drop the track under the
    /// cursor from the open playlist.
    pub fn delete_selection(&mut self) -> Result<Option<Notice>, CatalogError> {
        let notice = match self.view {
            View::Playlists => {
                let Some(entry) = self.selected_entry() else {
                    return Ok(None);
                };
                let p = self.catalog.delete_playlist(entry.id)?;
                if self.target_playlist == Some(p.id) {
                    self.target_playlist = None;
                }
                Notice::success(format!("Deleted playlist \"{}\"", p.name))
            }
            View::Playlist(id) => {
                let Some(track_id) = self.selected_track().map(|t| t.id) else {
                    return Ok(None);
                };
                let p = self.catalog.remove_from_playlist(id, track_id)?;
                Notice::success(format!("Removed from \"{}\"", p.name))
            }
            _ => return Ok(None),
        };
        self.clamp_selection();
        Ok(Some(notice))
    }

    /// Move the track under the cursor one place down (`1`) or up (`-1`)
    /// within the open playlist, keeping the cursor on it.
    pub fn move_selection(&mut self, delta: isize) -> Result<(), CatalogError> {
        let View::Playlist(id) = self.view else {
            return Ok(());
        };
        let mut ids: Vec<u64> = self.visible().iter().map(|t| t.id).collect();
        let Some(to) = self
            .selected
            .checked_add_signed(delta)
            .filter(|to| *to < ids.len())
        else {
            return Ok(());
        };
        ids.swap(self.selected, to);
        self.catalog.reorder_playlist(id, &ids)?;
        self.selected = to;
        Ok(())
    }

    pub fn set_notice(&mut self, notice: Notice, now: Instant) {
        self.notice = Some((notice, now));
    }

    /// The last notice, if it was raised less than `ttl` ago.
    pub fn active_notice(&self, now: Instant, ttl: Duration) -> Option<&Notice> {
        self.notice
            .as_ref()
            .filter(|(_, at)| now.saturating_duration_since(*at) < ttl)
            .map(|(n, _)| n)
    }

    fn clamp_selection(&mut self) {
        let len = self.row_count();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}
