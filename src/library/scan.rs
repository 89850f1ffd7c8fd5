use std::path::Path;

use lofty::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Read title/artist/album/duration from the file's tags.
///
/// Untagged or unreadable files keep the file stem as title and no other
/// metadata.
fn read_metadata(path: &Path, track: &mut Track) {
    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no readable tags");
            return;
        }
    };

    track.duration_secs = tagged.properties().duration().as_secs();

    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return;
    };
    if let Some(v) = tag.title().filter(|v| !v.trim().is_empty()) {
        track.title = v.trim().to_string();
    }
    if let Some(v) = tag.artist() {
        track.artist = v.trim().to_string();
    }
    if let Some(v) = tag.album() {
        track.album = v.trim().to_string();
    }
}

/// Scan `dir` for audio files and return them as tracks.
///
/// Tracks are sorted case-insensitively by "artist title" and numbered from 1
/// in that order, so ids are stable for an unchanged directory.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "skipping unreadable library entry");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();

        let mut track = Track {
            id: 0,
            title,
            artist: String::new(),
            album: String::new(),
            duration_secs: 0,
            audio_url: path.display().to_string(),
            is_liked: false,
        };
        read_metadata(path, &mut track);
        tracks.push(track);
    }

    tracks.sort_by_cached_key(|t| format!("{} {}", t.artist, t.title).to_lowercase());
    for (i, t) in tracks.iter_mut().enumerate() {
        t.id = i as u64 + 1;
    }

    debug!(dir = %dir.display(), count = tracks.len(), "library scanned");
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn scan_filters_non_audio_sorts_and_numbers_tracks() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let tracks = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].title, "A");
        assert_eq!(tracks[0].id, 1);
        assert_eq!(tracks[1].title, "b");
        assert_eq!(tracks[1].id, 2);
        assert!(tracks[1].audio_url.ends_with("b.MP3"));
        assert_eq!(tracks[0].duration_secs, 0);
        assert!(!tracks[0].is_liked);
    }

    #[test]
    fn scan_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            include_hidden: false,
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings);

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "visible");
    }

    #[test]
    fn scan_respects_recursive_false_and_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        fs::write(d1.join("one.mp3"), b"not real").unwrap();
        fs::write(d2.join("two.mp3"), b"not real").unwrap();

        let flat = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        let titles: Vec<String> = scan(dir.path(), &flat).into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["root".to_string()]);

        // WalkDir depth counts root as 0, so depth 2 reaches d1/* but not d1/d2/*.
        let capped = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let titles: Vec<String> = scan(dir.path(), &capped).into_iter().map(|t| t.title).collect();
        assert!(titles.contains(&"root".to_string()));
        assert!(titles.contains(&"one".to_string()));
        assert!(!titles.contains(&"two".to_string()));
    }
}
