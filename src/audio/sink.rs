//! `rodio`-backed media resource.
//!
//! One `Sink` per loaded track, connected to the output stream opened when
//! the resource is created. End of track is detected by polling the sink.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::error::MediaError;

use super::media::{LoadId, MediaEvent, MediaResource};

pub struct RodioMedia {
    stream: OutputStream,
    sink: Option<Sink>,
    load: LoadId,
    duration: Option<Duration>,
    volume: f32,
    started: bool,
    end_reported: bool,
    pending: Vec<MediaEvent>,
}

impl RodioMedia {
    /// Open the default output device.
    pub fn open() -> Result<Self, MediaError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| MediaError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which corrupts the TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            load: LoadId::default(),
            duration: None,
            volume: 1.0,
            started: false,
            end_reported: false,
            pending: Vec::new(),
        })
    }
}

/// Turn a media URL into a local path. Only plain paths and `file://` URLs
/// are playable.
pub(crate) fn resolve_media_path(url: &str) -> Result<PathBuf, MediaError> {
    let url = url.trim();
    if let Some(rest) = url.strip_prefix("file://") {
        return Ok(PathBuf::from(rest));
    }
    if url.is_empty() || url.contains("://") {
        return Err(MediaError::UnsupportedUrl(url.to_string()));
    }
    Ok(PathBuf::from(url))
}

impl MediaResource for RodioMedia {
    fn load(
        &mut self,
        load: LoadId,
        url: &str,
        duration_hint: Option<Duration>,
    ) -> Result<(), MediaError> {
        self.stop();
        self.load = load;
        self.end_reported = false;

        let path = resolve_media_path(url)?;
        let file = File::open(&path).map_err(|source| MediaError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| MediaError::Decode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        self.duration = source.total_duration().or(duration_hint);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume);
        sink.append(source);
        sink.pause();
        self.sink = Some(sink);

        self.pending.push(MediaEvent::LoadedMetadata { load });
        Ok(())
    }

    fn play(&mut self) -> Result<(), MediaError> {
        let sink = self.sink.as_ref().ok_or(MediaError::NothingLoaded)?;
        sink.play();
        self.started = true;
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.duration = None;
        self.started = false;
    }

    fn current_time(&self) -> Duration {
        self.sink
            .as_ref()
            .map_or(Duration::ZERO, |sink| sink.get_pos())
    }

    fn set_current_time(&mut self, position: Duration) -> Result<(), MediaError> {
        let sink = self.sink.as_ref().ok_or(MediaError::NothingLoaded)?;
        sink.try_seek(position)
            .map_err(|e| MediaError::Seek(e.to_string()))
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        if let Some(sink) = &self.sink {
            if self.started && !self.end_reported && !sink.is_paused() && sink.empty() {
                self.end_reported = true;
                self.pending.push(MediaEvent::Ended { load: self.load });
            }
        }
        std::mem::take(&mut self.pending)
    }

    fn fade_out(&mut self, over: Duration) {
        let Some(sink) = &self.sink else {
            return;
        };
        if over.is_zero() {
            sink.set_volume(0.0);
            return;
        }
        let steps: u32 = 20;
        let step = (over / steps).max(Duration::from_millis(1));
        let start = self.volume;
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            sink.set_volume(start * (1.0 - t));
            thread::sleep(step);
        }
        sink.set_volume(0.0);
    }
}
