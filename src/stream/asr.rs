use std::sync::{Arc, Mutex, PoisonError};

use diatheke_types::{AsrInput, AsrResult, TokenData};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tonic::Status;

use super::outbound::{outbound, OutboundSink};
use crate::error::{Error, Result};
use crate::transport::Transport;

type Outcome = std::result::Result<AsrResult, Status>;
type Published = Arc<Mutex<Option<Outcome>>>;

/// Audio input for a session: many audio chunks in, one [`AsrResult`] out.
///
/// The server may answer before all audio was sent (e.g. when it detects the
/// end of the utterance). From then on the send methods return `false`.
pub struct AsrStream {
    sink: OutboundSink<AsrInput>,
    published: Published,
    answered: watch::Receiver<bool>,
    task: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl AsrStream {
    pub(crate) fn open(transport: Arc<dyn Transport>, token: TokenData) -> Self {
        let (sink, requests) = outbound(AsrInput::token(token));
        let published: Published = Arc::new(Mutex::new(None));
        let (answer_tx, answered) = watch::channel(false);

        let slot = published.clone();
        let task = tokio::spawn(async move {
            let result = transport.stream_asr(requests).await;
            match &result {
                Ok(result) => tracing::debug!("asr result received: {:?}", result.text),
                Err(status) => tracing::debug!("asr stream failed: {}", status),
            }
            publish(&slot, result);
            answer_tx.send_replace(true);
        });

        Self {
            sink,
            published,
            answered,
            task: tokio::sync::Mutex::new(Some(task)),
        }
    }

    /// Sends a chunk of audio in the format the session's model expects.
    ///
    /// Returns `false` once the result is available or the stream can no
    /// longer take data. The caller should stop sending and call
    /// [`result`](Self::result).
    pub async fn send_audio(&self, audio: impl Into<Vec<u8>>) -> bool {
        self.send(AsrInput::audio(audio)).await
    }

    /// Sends a token mid-stream. Rarely needed: the stream already starts
    /// with the token it was created with.
    pub async fn send_token(&self, token: TokenData) -> bool {
        self.send(AsrInput::token(token)).await
    }

    async fn send(&self, input: AsrInput) -> bool {
        if self.has_result() {
            return false;
        }
        let mut answered = self.answered.clone();
        tokio::select! {
            written = self.sink.write(input) => match written {
                Ok(()) => true,
                Err(e) => {
                    tracing::debug!("asr input rejected: {}", e);
                    false
                }
            },
            _ = answered.wait_for(|answered| *answered) => false,
        }
    }

    pub fn has_result(&self) -> bool {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Waits for the recognition result.
    ///
    /// If the server has not answered yet, the audio stream is closed first so
    /// that it does. Later calls return the same value (or the same error)
    /// without touching the network.
    ///
    /// Cancel safe: a call dropped while waiting leaves the stream as it was,
    /// and the next call picks up the wait.
    pub async fn result(&self) -> Result<AsrResult> {
        let mut task = self.task.lock().await;
        if let Some(handle) = task.as_mut() {
            if !self.has_result() {
                self.sink.finish().await;
            }
            let joined = handle.await;
            *task = None;
            if let Err(e) = joined {
                publish(
                    &self.published,
                    Err(Status::internal(format!("asr stream task failed: {e}"))),
                );
            }
        }
        drop(task);

        match &*self.published.lock().unwrap_or_else(PoisonError::into_inner) {
            Some(Ok(result)) => Ok(result.clone()),
            Some(Err(status)) => Err(Error::Status(status.clone())),
            None => Err(Error::Status(Status::internal("asr stream ended without a result"))),
        }
    }
}

fn publish(slot: &Mutex<Option<Outcome>>, value: Outcome) {
    let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
    debug_assert!(guard.is_none(), "asr result published twice");
    if guard.is_some() {
        tracing::error!("asr result published twice, keeping the first one");
        return;
    }
    *guard = Some(value);
}
