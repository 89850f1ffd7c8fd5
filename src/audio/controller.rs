//! The playback controller.
//!
//! Owns exactly one media resource and the play queue. All state changes go
//! through the command methods below; readers get a `PlayerState` snapshot.
//! The resource is stopped when the controller is dropped.

use std::fmt::Display;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::config::{AudioSettings, PlaybackSettings};
use crate::library::Track;

use super::media::{LoadId, MediaEvent, MediaResource};
use super::queue::{PlayQueue, Removal};
use super::timer::ProgressTimer;
use super::types::{AudioCmd, Notice, PlayerState, RepeatMode, TransportState};

/// Start-up values for a controller.
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub initial_volume: f32,
    pub shuffle: bool,
    pub shuffle_avoid_repeat: bool,
    pub repeat_mode: RepeatMode,
    pub progress_interval: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            initial_volume: 0.7,
            shuffle: false,
            shuffle_avoid_repeat: false,
            repeat_mode: RepeatMode::None,
            progress_interval: Duration::from_millis(1000),
        }
    }
}

impl ControllerOptions {
    pub fn from_settings(audio: &AudioSettings, playback: &PlaybackSettings) -> Self {
        Self {
            initial_volume: audio.initial_volume,
            shuffle: playback.shuffle,
            shuffle_avoid_repeat: playback.shuffle_avoid_repeat,
            repeat_mode: playback.repeat_mode.into(),
            progress_interval: Duration::from_millis(audio.progress_interval_ms),
        }
    }
}

pub struct PlaybackController<M: MediaResource, R: Rng = StdRng> {
    media: M,
    rng: R,
    notices: Sender<Notice>,
    queue: PlayQueue,
    transport: TransportState,
    progress_percent: f64,
    volume: f32,
    shuffle_on: bool,
    shuffle_avoid_repeat: bool,
    repeat_mode: RepeatMode,
    load_id: LoadId,
    timer: ProgressTimer,
}

impl<M: MediaResource, R: Rng> PlaybackController<M, R> {
    pub fn new(mut media: M, rng: R, notices: Sender<Notice>, options: ControllerOptions) -> Self {
        let volume = if options.initial_volume.is_nan() {
            ControllerOptions::default().initial_volume
        } else {
            options.initial_volume.clamp(0.0, 1.0)
        };
        media.set_volume(volume);

        Self {
            media,
            rng,
            notices,
            queue: PlayQueue::default(),
            transport: TransportState::Stopped,
            progress_percent: 0.0,
            volume,
            shuffle_on: options.shuffle,
            shuffle_avoid_repeat: options.shuffle_avoid_repeat,
            repeat_mode: options.repeat_mode,
            load_id: LoadId::default(),
            timer: ProgressTimer::new(options.progress_interval),
        }
    }

    pub fn snapshot(&self) -> PlayerState {
        PlayerState {
            current_track: self.queue.current().cloned(),
            transport: self.transport,
            progress_percent: self.progress_percent,
            volume: self.volume,
            shuffle_on: self.shuffle_on,
            repeat_mode: self.repeat_mode,
            queue: self.queue.tracks().to_vec(),
            current_index: self.queue.current_index(),
            elapsed: self.media.current_time(),
            duration: self.media.duration(),
        }
    }

    pub fn transport(&self) -> TransportState {
        self.transport
    }

    pub fn progress_percent(&self) -> f64 {
        self.progress_percent
    }

    /// Whether a progress sample is scheduled.
    pub fn timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    /// When the owner should next call `poll` for a progress sample.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Apply a command received from the front end. `Quit` is left to the owner.
    pub fn apply(&mut self, cmd: AudioCmd) {
        debug!(?cmd, "command");
        match cmd {
            AudioCmd::PlayTrack {
                track,
                queue,
                start_index,
            } => self.play_track(track, queue, start_index),
            AudioCmd::TogglePlay => self.toggle_play(),
            AudioCmd::SkipNext => self.skip_next(),
            AudioCmd::SkipPrevious => self.skip_previous(),
            AudioCmd::SeekTo(p) => self.seek_to(p),
            AudioCmd::SeekBy(secs) => self.seek_by(secs),
            AudioCmd::SetVolume(v) => self.set_volume(v),
            AudioCmd::ToggleShuffle => self.toggle_shuffle(),
            AudioCmd::ToggleRepeat => self.toggle_repeat(),
            AudioCmd::AddToQueue(tracks) => self.add_to_queue(tracks),
            AudioCmd::RemoveFromQueue(i) => self.remove_from_queue(i),
            AudioCmd::ClearQueue => self.clear_queue(),
            AudioCmd::Quit { .. } => {}
        }
    }

    /// Replace the queue with `queue` and play `queue[start_index]` from the
    /// start. An out-of-range index falls back to `track` (see
    /// `PlayQueue::replace`). A `None` track is ignored.
    pub fn play_track(&mut self, track: Option<Track>, queue: Vec<Track>, start_index: usize) {
        let Some(track) = track else {
            debug!("play_track without a track ignored");
            return;
        };
        self.queue.replace(queue, start_index, &track);
        self.start_current();
    }

    pub fn toggle_play(&mut self) {
        if self.queue.current().is_none() {
            return;
        }
        match self.transport {
            TransportState::Playing => {
                self.media.pause();
                self.transport = TransportState::Paused;
                self.timer.disarm();
            }
            TransportState::Paused => match self.media.play() {
                Ok(()) => {
                    self.transport = TransportState::Playing;
                    self.timer.arm(Instant::now());
                }
                Err(e) => self.fail("Failed to play track", e),
            },
            // Nothing is loaded after the queue ran out; start over.
            TransportState::Stopped => self.start_current(),
        }
    }

    pub fn skip_next(&mut self) {
        match self.pick_next() {
            Some(next) => {
                self.queue.set_current(next);
                self.start_current();
            }
            None => debug!("end of queue"),
        }
    }

    pub fn skip_previous(&mut self) {
        if let Some(prev) = self.queue.prev_index() {
            self.queue.set_current(prev);
            self.start_current();
        }
    }

    /// Seek to `percent` of the duration, clamped to 0..=100.
    ///
    /// Ignored while the duration is unknown.
    pub fn seek_to(&mut self, percent: f64) {
        if percent.is_nan() {
            return;
        }
        let Some(duration) = self.known_duration() else {
            return;
        };
        let percent = percent.clamp(0.0, 100.0);
        match self.media.set_current_time(duration.mul_f64(percent / 100.0)) {
            Ok(()) => self.progress_percent = percent,
            Err(e) => warn!(error = %e, "seek failed"),
        }
    }

    pub fn seek_by(&mut self, seconds: i64) {
        let Some(duration) = self.known_duration() else {
            return;
        };
        let target = self.media.current_time().as_secs_f64() + seconds as f64;
        self.seek_to(target / duration.as_secs_f64() * 100.0);
    }

    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.media.set_volume(volume);
        self.volume = volume;
    }

    /// Only affects future picks; the queue order is left alone.
    pub fn toggle_shuffle(&mut self) {
        self.shuffle_on = !self.shuffle_on;
    }

    pub fn toggle_repeat(&mut self) {
        self.repeat_mode = self.repeat_mode.next();
    }

    pub fn add_to_queue(&mut self, tracks: Vec<Track>) {
        if tracks.is_empty() {
            return;
        }
        let n = tracks.len();
        self.queue.append(tracks);
        let plural = if n > 1 { "s" } else { "" };
        self.notify(Notice::success(format!("Added {n} track{plural} to queue")));
    }

    pub fn remove_from_queue(&mut self, index: usize) {
        match self.queue.remove(index) {
            Removal::Ignored => debug!(index, "remove_from_queue out of range"),
            Removal::Unaffected => {}
            Removal::Replaced => self.start_current(),
            Removal::Emptied => {
                // Invalidate anything still in flight for the removed track.
                self.load_id = self.load_id.next();
                self.media.stop();
                self.transport = TransportState::Stopped;
                self.progress_percent = 0.0;
                self.timer.disarm();
            }
        }
    }

    pub fn clear_queue(&mut self) {
        self.queue.collapse_to_current();
    }

    /// React to an event from the media resource.
    ///
    /// Events tagged with an older `LoadId` belong to a superseded track and
    /// are dropped.
    pub fn handle_event(&mut self, event: MediaEvent) {
        if event.load() != self.load_id {
            debug!(?event, current = ?self.load_id, "stale media event dropped");
            return;
        }
        match event {
            MediaEvent::LoadedMetadata { .. } => self.progress_percent = 0.0,
            MediaEvent::Ended { .. } => self.on_track_end(),
            MediaEvent::Error { message, .. } => self.fail("Failed to load audio track", message),
        }
    }

    /// Recompute `progress_percent` from the resource's clock.
    pub fn sample_progress(&mut self) {
        if let Some(duration) = self.known_duration() {
            let pct = self.media.current_time().as_secs_f64() / duration.as_secs_f64() * 100.0;
            self.progress_percent = pct.clamp(0.0, 100.0);
        }
    }

    /// Drain media events, then take a progress sample if one is due.
    pub fn poll(&mut self, now: Instant) {
        for event in self.media.poll_events() {
            self.handle_event(event);
        }
        if self.transport == TransportState::Playing && self.timer.is_due(now) {
            self.sample_progress();
            self.timer.arm(now);
        }
    }

    /// Fade the output out and release the resource.
    pub fn shutdown(mut self, fade_out: Duration) {
        if self.transport == TransportState::Playing {
            self.media.fade_out(fade_out);
        }
        self.transport = TransportState::Stopped;
        // Drop stops the resource.
    }

    fn on_track_end(&mut self) {
        if self.repeat_mode == RepeatMode::One {
            self.start_current();
            return;
        }
        match self.pick_next() {
            Some(next) => {
                self.queue.set_current(next);
                self.start_current();
            }
            None => {
                debug!("queue finished");
                self.transport = TransportState::Stopped;
                self.progress_percent = 100.0;
                self.timer.disarm();
            }
        }
    }

    fn pick_next(&mut self) -> Option<usize> {
        self.queue.next_index(
            self.shuffle_on,
            self.shuffle_avoid_repeat,
            self.repeat_mode,
            &mut self.rng,
        )
    }

    /// Load the current queue entry under a fresh `LoadId` and start it.
    fn start_current(&mut self) {
        let Some(track) = self.queue.current().cloned() else {
            return;
        };
        self.load_id = self.load_id.next();
        self.progress_percent = 0.0;

        info!(id = track.id, title = %track.title, load = ?self.load_id, "loading track");
        if let Err(e) = self
            .media
            .load(self.load_id, &track.audio_url, track.duration())
        {
            self.fail("Failed to load audio track", e);
            return;
        }
        if let Err(e) = self.media.play() {
            self.fail("Failed to play track", e);
            return;
        }
        self.transport = TransportState::Playing;
        self.timer.arm(Instant::now());
    }

    fn fail(&mut self, message: &str, err: impl Display) {
        warn!(error = %err, "{message}");
        self.media.pause();
        self.transport = TransportState::Stopped;
        self.timer.disarm();
        self.notify(Notice::error(message));
    }

    fn known_duration(&self) -> Option<Duration> {
        self.media.duration().filter(|d| !d.is_zero())
    }

    fn notify(&self, notice: Notice) {
        // The front end may already be gone during shutdown.
        let _ = self.notices.send(notice);
    }
}

impl<M: MediaResource, R: Rng> Drop for PlaybackController<M, R> {
    fn drop(&mut self) {
        self.timer.disarm();
        self.media.stop();
    }
}
