#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct Empty {}

/// Component versions reported by the server.
#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct VersionResponse {
    /// Diatheke (dialog engine) version.
    #[prost(string, tag = "1")]
    pub diatheke: String,
    /// Chosun (NLU) version.
    #[prost(string, tag = "2")]
    pub chosun: String,
    /// Cubic (ASR) version.
    #[prost(string, tag = "3")]
    pub cubic: String,
    /// Luna (TTS) version.
    #[prost(string, tag = "4")]
    pub luna: String,
}

#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct ListModelsResponse {
    #[prost(message, repeated, tag = "1")]
    pub models: Vec<ModelInfo>,
}

/// A dialog model available on the server.
#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct ModelInfo {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub language: String,
    /// Sample rate expected for audio sent to ASR streams.
    #[prost(uint32, tag = "4")]
    pub asr_sample_rate: u32,
    /// Sample rate of audio produced by TTS streams.
    #[prost(uint32, tag = "5")]
    pub tts_sample_rate: u32,
}
