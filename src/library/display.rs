use std::path::Path;

use crate::config::TrackDisplayField;

use super::model::Track;

/// Build a display string for `track` according to `fields` and `sep`.
///
/// Empty metadata fields are skipped; when nothing is produced the title is
/// returned as-is.
pub fn display_from_fields(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        let part = match f {
            TrackDisplayField::Title => Some(track.title.trim()),
            TrackDisplayField::Artist => Some(track.artist.trim()),
            TrackDisplayField::Album => Some(track.album.trim()),
            TrackDisplayField::Filename => {
                let raw = track.audio_url.trim_start_matches("file://");
                Path::new(raw).file_stem().and_then(|s| s.to_str())
            }
        };
        if let Some(p) = part.filter(|s| !s.is_empty()) {
            parts.push(p.to_string());
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(sep)
    }
}

/// Format a number of seconds as `m:ss`.
///
/// Zero, negative and non-finite inputs render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Format a total length as `1h 5m`, or `5m` under an hour.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
