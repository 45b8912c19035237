//! Protocol messages for the `cobaltspeech.diatheke.Diatheke` service.
//!
//! The structs are wire-compatible with `diatheke.proto` and are encoded with
//! prost. They also derive serde so applications can log or persist them.

pub mod actions;
pub mod audio;
pub mod models;
pub mod session;

pub use actions::{
    Action, ActionData, CommandAction, ReplyAction, TranscribeAction, WaitForUserAction,
};
pub use audio::asr::{AsrInput, AsrResult};
pub use audio::transcription::{TranscribeInput, TranscribeResult};
pub use audio::tts::TtsAudio;
pub use models::{Empty, ListModelsResponse, ModelInfo, VersionResponse};
pub use session::{
    CommandResult, SessionInput, SessionOutput, SessionStart, SetStory, TextInput, TokenData,
};
