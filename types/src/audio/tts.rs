/// One chunk of synthesized speech, in the format the server is configured for.
#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct TtsAudio {
    #[prost(bytes = "vec", tag = "1")]
    pub audio: Vec<u8>,
}
