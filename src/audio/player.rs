use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::{AudioSettings, PlaybackSettings};
use crate::error::MediaError;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, Notice, PlayerHandle, PlayerState};

/// Front-end handle to the audio thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    state: PlayerHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Start the audio thread and wait until the output device is open.
    ///
    /// Returns the player together with the receiving end of the notice channel.
    pub fn spawn(
        audio: AudioSettings,
        playback: PlaybackSettings,
    ) -> Result<(Self, Receiver<Notice>), MediaError> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (notice_tx, notice_rx) = mpsc::channel::<Notice>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), MediaError>>();
        let state: PlayerHandle = Arc::new(Mutex::new(PlayerState::default()));

        let handle = spawn_audio_thread(rx, state.clone(), notice_tx, audio, playback, ready_tx);

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = handle.join();
                return Err(e);
            }
            Err(_) => {
                return Err(MediaError::Output(
                    "audio thread exited during start-up".to_string(),
                ));
            }
        }

        Ok((
            Self {
                tx,
                state,
                join: Mutex::new(Some(handle)),
            },
            notice_rx,
        ))
    }

    pub fn state_handle(&self) -> PlayerHandle {
        self.state.clone()
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    /// Ask the audio thread to fade out and wait for it to finish.
    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
