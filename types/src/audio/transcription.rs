use crate::actions::TranscribeAction;

/// A message on the client half of a `Transcribe` call.
///
/// The first message of a stream must carry the action; audio follows.
#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct TranscribeInput {
    #[prost(oneof = "transcribe_input::Data", tags = "1, 2")]
    pub data: Option<transcribe_input::Data>,
}

pub mod transcribe_input {
    #[derive(Clone, PartialEq, ::prost::Oneof, serde::Serialize, serde::Deserialize)]
    pub enum Data {
        #[prost(message, tag = "1")]
        Action(crate::actions::TranscribeAction),
        #[prost(bytes, tag = "2")]
        Audio(Vec<u8>),
    }
}

impl TranscribeInput {
    pub fn action(action: TranscribeAction) -> Self {
        Self {
            data: Some(transcribe_input::Data::Action(action)),
        }
    }

    pub fn audio(audio: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Some(transcribe_input::Data::Audio(audio.into())),
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct TranscribeResult {
    #[prost(string, tag = "1")]
    pub text: String,
    #[prost(double, tag = "2")]
    pub confidence: f64,
    /// Partial results may still change; the final one for an utterance does not.
    #[prost(bool, tag = "3")]
    pub is_partial: bool,
}
