pub mod asr;
pub mod transcription;
pub mod tts;
