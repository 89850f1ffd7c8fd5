use std::path::PathBuf;

use serde::Deserialize;

use crate::audio::RepeatMode;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadenza/config.toml` or `~/.config/cadenza/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CADENZA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub library: LibrarySettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume applied when the player starts (0.0 - 1.0).
    pub initial_volume: f32,
    /// How often playback progress is sampled while playing (milliseconds).
    pub progress_interval_ms: u64,
    /// How often the audio thread checks the output for end-of-track (milliseconds).
    pub event_poll_ms: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 0.7,
            progress_interval_ms: 1000,
            event_poll_ms: 100,
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Initial repeat mode.
    pub repeat_mode: RepeatModeSetting,
    /// When shuffling, never pick the track that is currently playing
    /// (as long as the queue holds more than one track).
    pub shuffle_avoid_repeat: bool,
}

#[derive(Debug, Copy, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatModeSetting {
    #[default]
    #[serde(alias = "off", alias = "no-repeat", alias = "no_repeat")]
    None,
    #[serde(alias = "repeat-all", alias = "repeat_all", alias = "loop-all")]
    All,
    #[serde(alias = "repeat-one", alias = "repeat_one", alias = "loop-one")]
    One,
}

impl From<RepeatModeSetting> for RepeatMode {
    fn from(s: RepeatModeSetting) -> Self {
        match s {
            RepeatModeSetting::None => RepeatMode::None,
            RepeatModeSetting::All => RepeatMode::All,
            RepeatModeSetting::One => RepeatMode::One,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to seek when pressing `H` / `L`.
    pub seek_seconds: u64,
    /// Volume change per `-` / `+` key press.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            seek_seconds: 5,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Where liked tracks are stored. Defaults to `$XDG_DATA_HOME/cadenza/likes.toml`.
    pub likes_file: Option<PathBuf>,
    /// Where playlists are stored. Defaults to `$XDG_DATA_HOME/cadenza/playlists.toml`.
    pub playlists_file: Option<PathBuf>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
            likes_file: None,
            playlists_file: None,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    Title,
    Artist,
    Album,
    Filename,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Which track fields to show in the now-playing bar, and in what order.
    ///
    /// Example: ["artist", "title", "album"]
    pub now_playing_fields: Vec<TrackDisplayField>,

    /// Separator used to join `now_playing_fields`.
    pub now_playing_separator: String,

    /// How long a notice stays in the status line (seconds).
    pub notice_seconds: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " cadenza ".to_string(),
            now_playing_fields: vec![TrackDisplayField::Artist, TrackDisplayField::Title],
            now_playing_separator: " - ".to_string(),
            notice_seconds: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directive, e.g. "info" or "cadenza=debug".
    /// `CADENZA_LOG` takes precedence when set.
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/cadenza/cadenza.log`.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
