use crate::session::TokenData;

/// A message on the client half of a `StreamASR` call.
///
/// The first message of a stream must carry a token; audio follows.
#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct AsrInput {
    #[prost(oneof = "asr_input::Data", tags = "1, 2")]
    pub data: Option<asr_input::Data>,
}

pub mod asr_input {
    #[derive(Clone, PartialEq, ::prost::Oneof, serde::Serialize, serde::Deserialize)]
    pub enum Data {
        #[prost(message, tag = "1")]
        Token(crate::session::TokenData),
        #[prost(bytes, tag = "2")]
        Audio(Vec<u8>),
    }
}

impl AsrInput {
    pub fn token(token: TokenData) -> Self {
        Self {
            data: Some(asr_input::Data::Token(token)),
        }
    }

    pub fn audio(audio: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Some(asr_input::Data::Audio(audio.into())),
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct AsrResult {
    #[prost(string, tag = "1")]
    pub text: String,
    /// Between 0.0 and 1.0.
    #[prost(double, tag = "2")]
    pub confidence: f64,
    /// Set when the server stopped listening because of its own timeout.
    #[prost(bool, tag = "3")]
    pub timed_out: bool,
}
