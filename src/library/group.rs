//! Album and artist grouping over scanned tracks.
//!
//! Grouping is case-insensitive. Tracks without an album (or artist) tag are
//! left out of the album (or artist) lists. Ids are assigned from 1 in
//! sorted order, like track ids.

use std::collections::BTreeMap;

use super::model::{Album, Artist, Track};

pub fn group_albums(tracks: &[Track]) -> Vec<Album> {
    let mut groups: BTreeMap<(String, String), Album> = BTreeMap::new();

    for t in tracks {
        let title = t.album.trim();
        if title.is_empty() {
            continue;
        }
        let artist = t.artist.trim();
        let key = (artist.to_lowercase(), title.to_lowercase());
        let album = groups.entry(key).or_insert_with(|| Album {
            id: 0,
            title: title.to_string(),
            artist: artist.to_string(),
            track_ids: Vec::new(),
            duration_secs: 0,
        });
        album.track_ids.push(t.id);
        album.duration_secs += t.duration_secs;
    }

    groups
        .into_values()
        .zip(1..)
        .map(|(album, id)| Album { id, ..album })
        .collect()
}

pub fn group_artists(tracks: &[Track], albums: &[Album]) -> Vec<Artist> {
    let mut groups: BTreeMap<String, Artist> = BTreeMap::new();

    for t in tracks {
        let name = t.artist.trim();
        if name.is_empty() {
            continue;
        }
        groups
            .entry(name.to_lowercase())
            .or_insert_with(|| Artist {
                id: 0,
                name: name.to_string(),
                album_ids: Vec::new(),
                track_ids: Vec::new(),
            })
            .track_ids
            .push(t.id);
    }

    for album in albums {
        if let Some(artist) = groups.get_mut(&album.artist.to_lowercase()) {
            artist.album_ids.push(album.id);
        }
    }

    groups
        .into_values()
        .zip(1..)
        .map(|(artist, id)| Artist { id, ..artist })
        .collect()
}
