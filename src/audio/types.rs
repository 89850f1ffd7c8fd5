//! Audio-related small types and handles.
//!
//! This module defines the enums, commands and the state snapshot shared
//! between the audio thread and the front end.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::library::Track;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Stop at the end of the queue.
    #[default]
    None,
    /// Wrap around to the start of the queue.
    All,
    /// Repeat the current track when it ends.
    One,
}

impl RepeatMode {
    /// The mode after this one in the `None -> All -> One` cycle.
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::All,
            Self::All => Self::One,
            Self::One => Self::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::All => "all",
            Self::One => "one",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Read-only snapshot of the controller, consumed by the front end.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// `queue[current_index]`, or `None` until a track has been selected.
    pub current_track: Option<Track>,
    pub transport: TransportState,
    /// Last sampled position, 0.0 - 100.0.
    pub progress_percent: f64,
    pub volume: f32,
    pub shuffle_on: bool,
    pub repeat_mode: RepeatMode,
    pub queue: Vec<Track>,
    pub current_index: Option<usize>,
    pub elapsed: Duration,
    pub duration: Option<Duration>,
}

impl PlayerState {
    pub fn is_playing(&self) -> bool {
        self.transport == TransportState::Playing
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            current_track: None,
            transport: TransportState::Stopped,
            progress_percent: 0.0,
            volume: 0.7,
            shuffle_on: false,
            repeat_mode: RepeatMode::None,
            queue: Vec::new(),
            current_index: None,
            elapsed: Duration::ZERO,
            duration: None,
        }
    }
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the queue and start playing `track` (ignored when `None`).
    PlayTrack {
        track: Option<Track>,
        queue: Vec<Track>,
        start_index: usize,
    },
    /// Pause or resume.
    TogglePlay,
    SkipNext,
    SkipPrevious,
    /// Seek to a position given as a percentage of the duration.
    SeekTo(f64),
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i64),
    SetVolume(f32),
    ToggleShuffle,
    ToggleRepeat,
    AddToQueue(Vec<Track>),
    RemoveFromQueue(usize),
    /// Collapse the queue to the current track.
    ClearQueue,
    /// Quit the audio thread, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A user-facing notification (toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub type PlayerHandle = Arc<Mutex<PlayerState>>;
