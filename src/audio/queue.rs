//! The play queue: an ordered list of tracks plus the current position.
//!
//! Invariant: `current` is `None` until a track has been selected for
//! playback, and otherwise always indexes into `tracks`.

use rand::Rng;

use crate::library::Track;

use super::types::RepeatMode;

/// What `PlayQueue::remove` did to the current position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Removal {
    /// The index was out of range; nothing changed.
    Ignored,
    /// Another entry was removed; the current track is unchanged.
    Unaffected,
    /// The current entry was removed and another track took its place.
    Replaced,
    /// The last entry was removed.
    Emptied,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayQueue {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl PlayQueue {
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.current?)
    }

    /// Replace the queue with `tracks`, positioned on `start_index`.
    ///
    /// The supplied queue is kept as is. Only when `start_index` is out of
    /// range does `track` decide the position: its first entry in `tracks`,
    /// or a queue of just `track` when it is absent.
    pub fn replace(&mut self, tracks: Vec<Track>, start_index: usize, track: &Track) {
        let (tracks, index) = if start_index < tracks.len() {
            (tracks, start_index)
        } else if let Some(pos) = tracks.iter().position(|t| t.id == track.id) {
            (tracks, pos)
        } else {
            (vec![track.clone()], 0)
        };
        self.tracks = tracks;
        self.current = Some(index);
    }

    /// Move to `index` if it is in range.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    /// Choose the entry to play after the current one.
    ///
    /// Shuffle picks uniformly over the whole queue (the current entry
    /// included unless `avoid_repeat` is set). Otherwise the next entry is
    /// used, wrapping only under `RepeatMode::All`. With no current entry the
    /// first one is next. `None` means the end of the queue was reached.
    pub fn next_index<R: Rng + ?Sized>(
        &self,
        shuffle: bool,
        avoid_repeat: bool,
        repeat: RepeatMode,
        rng: &mut R,
    ) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }

        if shuffle {
            if let Some(current) = self.current.filter(|_| avoid_repeat && len > 1) {
                let pick = rng.random_range(0..len - 1);
                return Some(if pick >= current { pick + 1 } else { pick });
            }
            return Some(rng.random_range(0..len));
        }

        let Some(current) = self.current else {
            return Some(0);
        };
        let next = current + 1;
        if next < len {
            Some(next)
        } else if repeat == RepeatMode::All {
            Some(0)
        } else {
            None
        }
    }

    /// The entry before the current one, always wrapping. With no current
    /// entry the last one is previous.
    pub fn prev_index(&self) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        Some(match self.current {
            Some(current) => (current + len - 1) % len,
            None => len - 1,
        })
    }

    pub fn append(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.tracks.extend(tracks);
    }

    pub fn remove(&mut self, index: usize) -> Removal {
        if index >= self.tracks.len() {
            return Removal::Ignored;
        }
        self.tracks.remove(index);

        let Some(current) = self.current else {
            return Removal::Unaffected;
        };
        if self.tracks.is_empty() {
            self.current = None;
            return Removal::Emptied;
        }

        if index < current {
            self.current = Some(current - 1);
            Removal::Unaffected
        } else if index == current {
            if current >= self.tracks.len() {
                self.current = Some(0);
            }
            Removal::Replaced
        } else {
            Removal::Unaffected
        }
    }

    /// Keep only the current track, or nothing when there is none.
    pub fn collapse_to_current(&mut self) {
        match self.current().cloned() {
            Some(t) => {
                self.tracks = vec![t];
                self.current = Some(0);
            }
            None => {
                self.tracks.clear();
                self.current = None;
            }
        }
    }
}
