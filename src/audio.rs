//! Audio playback: the playback controller, its media resource seam, the
//! `rodio` implementation and the thread that hosts them.

mod controller;
mod media;
mod player;
mod queue;
mod sink;
mod thread;
mod timer;
mod types;

pub use player::AudioPlayer;
pub use types::*;
