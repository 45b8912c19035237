//! Adapters between application-facing stream handles and the transport.
//!
//! Each handle owns one background task driving its RPC. Handles can be
//! shared between tasks behind an `Arc`; sending and receiving may happen
//! concurrently.

mod asr;
mod helpers;
pub mod outbound;
mod transcribe;
mod tts;

pub use asr::AsrStream;
pub use helpers::{read_asr_audio, read_transcribe_audio, write_tts_audio};
pub use outbound::{outbound, OutboundError, OutboundSink, OutboundStream};
pub use transcribe::TranscribeStream;
pub use tts::TtsStream;
