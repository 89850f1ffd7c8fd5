use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, error};

use crate::config::{AudioSettings, PlaybackSettings};
use crate::error::MediaError;

use super::controller::{ControllerOptions, PlaybackController};
use super::media::MediaResource;
use super::sink::RodioMedia;
use super::types::{AudioCmd, Notice, PlayerHandle, TransportState};

fn publish<M: MediaResource>(state: &PlayerHandle, controller: &PlaybackController<M>) {
    if let Ok(mut s) = state.lock() {
        *s = controller.snapshot();
    }
}

/// Spawn the thread that owns the output device and the controller.
///
/// `ready` receives exactly one message: whether the output device opened.
pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    state: PlayerHandle,
    notices: Sender<Notice>,
    audio: AudioSettings,
    playback: PlaybackSettings,
    ready: Sender<Result<(), MediaError>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        // The output stream is opened here so it never crosses threads.
        let media = match RodioMedia::open() {
            Ok(m) => {
                let _ = ready.send(Ok(()));
                m
            }
            Err(e) => {
                error!(error = %e, "cannot open audio output");
                let _ = ready.send(Err(e));
                return;
            }
        };

        let mut controller = PlaybackController::new(
            media,
            StdRng::from_os_rng(),
            notices,
            ControllerOptions::from_settings(&audio, &playback),
        );
        publish(&state, &controller);

        let poll_every = Duration::from_millis(audio.event_poll_ms.max(1));

        loop {
            // Wake for the next progress sample or the next end-of-track check,
            // whichever comes first.
            let timeout = controller
                .next_deadline()
                .map(|due| due.saturating_duration_since(Instant::now()))
                .map_or(poll_every, |until| until.min(poll_every));

            match rx.recv_timeout(timeout) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    debug!(fade_out_ms, "audio thread quitting");
                    controller.shutdown(Duration::from_millis(fade_out_ms));
                    // Update shared state so the UI doesn't keep showing Playing.
                    if let Ok(mut s) = state.lock() {
                        s.transport = TransportState::Stopped;
                    }
                    break;
                }
                Ok(cmd) => controller.apply(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            controller.poll(Instant::now());
            publish(&state, &controller);
        }
    })
}
