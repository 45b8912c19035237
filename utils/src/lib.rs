//! Audio capture and playback through external applications.
//!
//! The recorder writes raw audio to its stdout; the player reads raw audio
//! from its stdin. Which applications to run (e.g. `sox`, `arecord`,
//! `aplay`) and their arguments are left to the caller, so the audio format
//! can match the model's sample rate.

pub mod audio;

pub use audio::{AudioConfig, Player, Recorder};
