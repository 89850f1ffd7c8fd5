//! The media resource seam.
//!
//! A `MediaResource` is the single playback device the controller drives.
//! Every load is tagged with a `LoadId`; events carry the id of the load that
//! produced them so the controller can drop events from superseded loads.

use std::time::Duration;

use crate::error::MediaError;

/// Identifies one `load` call. Strictly increasing per controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LoadId(u64);

impl LoadId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Duration and stream parameters are known.
    LoadedMetadata { load: LoadId },
    /// Playback reached the end of the media.
    Ended { load: LoadId },
    /// Loading or playing failed after the call returned.
    Error { load: LoadId, message: String },
}

impl MediaEvent {
    pub fn load(&self) -> LoadId {
        match self {
            Self::LoadedMetadata { load } | Self::Ended { load } | Self::Error { load, .. } => *load,
        }
    }
}

pub trait MediaResource {
    /// Replace the loaded media with `url`. Playback starts paused.
    ///
    /// `duration_hint` is used when the media itself cannot report a duration.
    fn load(
        &mut self,
        load: LoadId,
        url: &str,
        duration_hint: Option<Duration>,
    ) -> Result<(), MediaError>;

    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    /// Stop playback and drop the loaded media.
    fn stop(&mut self);

    fn current_time(&self) -> Duration;

    fn set_current_time(&mut self, position: Duration) -> Result<(), MediaError>;

    fn duration(&self) -> Option<Duration>;

    fn volume(&self) -> f32;

    fn set_volume(&mut self, volume: f32);

    /// Drain the events produced since the last call.
    fn poll_events(&mut self) -> Vec<MediaEvent>;

    /// Ramp the output volume down to silence over `over`.
    fn fade_out(&mut self, over: Duration) {
        let _ = over;
    }
}
