use std::sync::Arc;

use diatheke_types::{TranscribeAction, TranscribeInput, TranscribeResult};
use futures::StreamExt;
use tokio::sync::{watch, Mutex};
use tonic::Status;

use super::outbound::{outbound, OutboundError, OutboundSink};
use crate::client::consts::HANDOFF_CAPACITY;
use crate::error::{Error, Result};
use crate::queue::{handoff, HandoffReceiver};
use crate::transport::Transport;

/// Two-way transcription: audio goes up while results come down.
///
/// The two halves close independently. [`send_finished`](Self::send_finished)
/// ends the audio, but results keep arriving until the server closes its
/// side, which [`receive_result`](Self::receive_result) reports as `Ok(None)`.
pub struct TranscribeStream {
    sink: OutboundSink<TranscribeInput>,
    results: Mutex<HandoffReceiver<std::result::Result<TranscribeResult, Status>>>,
    done: watch::Receiver<bool>,
}

impl TranscribeStream {
    pub(crate) fn open(transport: Arc<dyn Transport>, action: TranscribeAction) -> Self {
        let (sink, requests) = outbound(TranscribeInput::action(action));
        let (results_tx, results) = handoff(HANDOFF_CAPACITY);
        let (done_tx, done) = watch::channel(false);

        tokio::spawn(async move {
            match transport.transcribe(requests).await {
                Ok(mut responses) => {
                    while let Some(message) = responses.next().await {
                        let failed = message.is_err();
                        if results_tx.put(message).await.is_err() {
                            tracing::debug!("transcribe stream dropped with results unread");
                            break;
                        }
                        if failed {
                            break;
                        }
                    }
                }
                Err(status) => {
                    tracing::debug!("transcribe call failed to start: {}", status);
                    if let Err(e) = results_tx.put(Err(status)).await {
                        tracing::debug!("transcribe start failure not delivered: {}", e);
                    }
                }
            }
            done_tx.send_replace(true);
            if let Err(e) = results_tx.finish().await {
                tracing::debug!("transcribe end of results not delivered: {}", e);
            }
        });

        Self {
            sink,
            results: Mutex::new(results),
            done,
        }
    }

    /// Sends another transcribe action on the same stream.
    pub async fn send_action(&self, action: TranscribeAction) -> Result<bool> {
        self.send(TranscribeInput::action(action)).await
    }

    /// Sends a chunk of audio.
    ///
    /// `Ok(false)` means the server has closed its side; stop sending.
    /// Sending after [`send_finished`](Self::send_finished) is an error.
    pub async fn send_audio(&self, audio: impl Into<Vec<u8>>) -> Result<bool> {
        self.send(TranscribeInput::audio(audio)).await
    }

    async fn send(&self, input: TranscribeInput) -> Result<bool> {
        if self.sink.is_finished() {
            return Err(Error::StreamClosed);
        }
        if self.is_done() {
            return Ok(false);
        }
        let mut done = self.done.clone();
        tokio::select! {
            written = self.sink.write(input) => match written {
                Ok(()) => Ok(true),
                Err(OutboundError::Finished) => Err(Error::StreamClosed),
                Err(OutboundError::Disconnected) => Ok(false),
            },
            _ = done.wait_for(|done| *done) => Ok(false),
        }
    }

    /// Ends the audio. Results already in flight are still delivered.
    pub async fn send_finished(&self) {
        self.sink.finish().await;
    }

    /// Waits for the next result. `Ok(None)` once the server has closed its
    /// side, and on every call after that.
    pub async fn receive_result(&self) -> Result<Option<TranscribeResult>> {
        let mut results = self.results.lock().await;
        match results.get().await {
            Some(Ok(result)) => Ok(Some(result)),
            Some(Err(status)) => Err(status.into()),
            None => Ok(None),
        }
    }

    /// True once the server has closed its side of the stream.
    pub fn is_done(&self) -> bool {
        *self.done.borrow() || self.done.has_changed().is_err()
    }
}
