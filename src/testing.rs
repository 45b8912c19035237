//! Test doubles for [`Transport`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use diatheke_types::audio::asr::asr_input;
use diatheke_types::audio::transcription::transcribe_input;
use diatheke_types::{
    AsrInput, AsrResult, ListModelsResponse, ReplyAction, SessionInput, SessionOutput,
    SessionStart, TokenData, TranscribeInput, TranscribeResult, TtsAudio, VersionResponse,
};
use futures::{stream, StreamExt};
use tokio::sync::mpsc;
use tonic::Status;

use crate::stream::OutboundStream;
use crate::transport::{ResponseStream, Transport};

/// Answers ASR with a fixed result, echoes every transcribe audio chunk back
/// as a result, and plays back canned TTS chunks. Unary calls are not
/// implemented.
#[derive(Default)]
pub struct FakeTransport {
    pub asr_result: AsrResult,
    pub asr_error: Option<Status>,
    /// Answer after this many audio chunks instead of waiting for the end.
    pub asr_stop_after: Option<usize>,
    pub transcribe_close_after: Option<usize>,
    /// Sent after the echoed results.
    pub transcribe_error: Option<Status>,
    /// Fails the call before it starts.
    pub transcribe_reject: Option<Status>,
    pub tts_chunks: Vec<Vec<u8>>,
    asr_requests: Mutex<Vec<AsrInput>>,
    asr_calls: AtomicUsize,
    transcribe_requests: Arc<Mutex<Vec<TranscribeInput>>>,
}

impl FakeTransport {
    pub fn with_asr_text(text: &str) -> Self {
        Self {
            asr_result: AsrResult {
                text: text.to_string(),
                confidence: 0.9,
                timed_out: false,
            },
            ..Default::default()
        }
    }

    pub fn asr_requests(&self) -> Vec<AsrInput> {
        self.asr_requests.lock().unwrap().clone()
    }

    pub fn asr_audio(&self) -> Vec<u8> {
        self.asr_requests()
            .into_iter()
            .filter_map(|input| match input.data {
                Some(asr_input::Data::Audio(audio)) => Some(audio),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn asr_calls(&self) -> usize {
        self.asr_calls.load(Ordering::SeqCst)
    }

    pub fn transcribe_requests(&self) -> Vec<TranscribeInput> {
        self.transcribe_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn version(&self) -> Result<VersionResponse, Status> {
        Err(Status::unimplemented("version"))
    }

    async fn list_models(&self) -> Result<ListModelsResponse, Status> {
        Err(Status::unimplemented("list_models"))
    }

    async fn create_session(&self, _start: SessionStart) -> Result<SessionOutput, Status> {
        Err(Status::unimplemented("create_session"))
    }

    async fn delete_session(&self, _token: TokenData) -> Result<(), Status> {
        Err(Status::unimplemented("delete_session"))
    }

    async fn update_session(&self, _input: SessionInput) -> Result<SessionOutput, Status> {
        Err(Status::unimplemented("update_session"))
    }

    async fn stream_asr(
        &self,
        mut requests: OutboundStream<AsrInput>,
    ) -> Result<AsrResult, Status> {
        self.asr_calls.fetch_add(1, Ordering::SeqCst);
        let mut audio_chunks = 0;
        while let Some(input) = requests.next().await {
            let is_audio = matches!(input.data, Some(asr_input::Data::Audio(_)));
            self.asr_requests.lock().unwrap().push(input);
            if is_audio {
                audio_chunks += 1;
                if self.asr_stop_after == Some(audio_chunks) {
                    break;
                }
            }
        }
        match &self.asr_error {
            Some(status) => Err(status.clone()),
            None => Ok(self.asr_result.clone()),
        }
    }

    async fn stream_tts(&self, _reply: ReplyAction) -> Result<ResponseStream<TtsAudio>, Status> {
        let chunks: Vec<Result<TtsAudio, Status>> = self
            .tts_chunks
            .iter()
            .map(|audio| Ok(TtsAudio { audio: audio.clone() }))
            .collect();
        Ok(stream::iter(chunks).boxed())
    }

    async fn transcribe(
        &self,
        mut requests: OutboundStream<TranscribeInput>,
    ) -> Result<ResponseStream<TranscribeResult>, Status> {
        if let Some(status) = &self.transcribe_reject {
            return Err(status.clone());
        }

        let (tx, rx) = mpsc::channel(1);
        let close_after = self.transcribe_close_after;
        let error = self.transcribe_error.clone();
        let log = self.transcribe_requests.clone();
        tokio::spawn(async move {
            let mut audio_chunks = 0;
            while let Some(input) = requests.next().await {
                let echo = match &input.data {
                    Some(transcribe_input::Data::Audio(audio)) => Some(TranscribeResult {
                        text: String::from_utf8_lossy(audio).into_owned(),
                        confidence: 1.0,
                        is_partial: true,
                    }),
                    _ => None,
                };
                log.lock().unwrap().push(input);
                if let Some(result) = echo {
                    audio_chunks += 1;
                    if tx.send(Ok(result)).await.is_err() {
                        return;
                    }
                    if close_after == Some(audio_chunks) {
                        break;
                    }
                }
            }
            if let Some(status) = error {
                let _ = tx.send(Err(status)).await;
            }
        });

        let results = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|result| (result, rx))
        });
        Ok(results.boxed())
    }
}

mockall::mock! {
    pub Transport {}

    #[async_trait]
    impl Transport for Transport {
        async fn version(&self) -> Result<VersionResponse, Status>;
        async fn list_models(&self) -> Result<ListModelsResponse, Status>;
        async fn create_session(&self, start: SessionStart) -> Result<SessionOutput, Status>;
        async fn delete_session(&self, token: TokenData) -> Result<(), Status>;
        async fn update_session(&self, input: SessionInput) -> Result<SessionOutput, Status>;
        async fn stream_asr(&self, requests: OutboundStream<AsrInput>) -> Result<AsrResult, Status>;
        async fn stream_tts(&self, reply: ReplyAction) -> Result<ResponseStream<TtsAudio>, Status>;
        async fn transcribe(
            &self,
            requests: OutboundStream<TranscribeInput>,
        ) -> Result<ResponseStream<TranscribeResult>, Status>;
    }
}

/// Session output carrying a token with the given id and no actions.
pub fn output_with_token(id: &str) -> SessionOutput {
    SessionOutput {
        token: Some(token(id)),
        action_list: Vec::new(),
    }
}

pub fn token(id: &str) -> TokenData {
    TokenData {
        data: format!("state-of-{id}").into_bytes(),
        id: id.to_string(),
        metadata: String::new(),
    }
}
