mod client;
mod error;
pub mod queue;
mod session;
pub mod stream;
pub mod transport;

#[cfg(test)]
mod testing;

pub use diatheke_types as types;

pub use client::{Client, ClientIdentity, Config, ConfigBuilder, ConfigError};
pub use error::{Error, Result};
pub use session::Session;
pub use stream::{
    read_asr_audio, read_transcribe_audio, write_tts_audio, AsrStream, TranscribeStream,
    TtsStream,
};
pub use transport::{GrpcTransport, ResponseStream, Transport};

#[cfg(feature = "utils")]
pub use diatheke_utils as utils;
