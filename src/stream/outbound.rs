//! Push-to-pull adapter for the client half of a streaming call.
//!
//! The application pushes messages through an [`OutboundSink`]; the transport
//! pulls them from the paired [`OutboundStream`]. The stream always yields the
//! context message (token, model id or action) first, before anything that
//! was written to the sink.

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::Mutex;

use crate::client::consts::HANDOFF_CAPACITY;
use crate::queue::{handoff, HandoffReceiver, HandoffSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OutboundError {
    /// `finish` was already called on this sink.
    #[error("stream already closed")]
    Finished,
    /// The transport stopped pulling from the stream (the call ended).
    #[error("stream no longer consumed by the transport")]
    Disconnected,
}

/// Creates a sink/stream pair whose stream starts with `context`.
pub fn outbound<M>(context: M) -> (OutboundSink<M>, OutboundStream<M>) {
    let (tx, rx) = handoff(HANDOFF_CAPACITY);
    let sink = OutboundSink {
        queue: tx,
        gate: Mutex::new(false),
        finished: AtomicBool::new(false),
    };
    let stream = OutboundStream {
        state: State::AwaitingContext,
        context: Some(context),
        queue: rx,
    };
    (sink, stream)
}

pub struct OutboundSink<M> {
    queue: HandoffSender<M>,
    // Serializes writers against `finish` so nothing is enqueued behind the
    // sentinel. Holds true once the sentinel is in the queue.
    gate: Mutex<bool>,
    // Set by the first `finish` call, even one that was cancelled.
    finished: AtomicBool,
}

impl<M> OutboundSink<M> {
    /// Waits for the handoff slot and enqueues `message`.
    ///
    /// Returns as soon as the message is queued; it does not wait for the
    /// transport to send it.
    pub async fn write(&self, message: M) -> Result<(), OutboundError> {
        let _gate = self.gate.lock().await;
        if self.finished.load(Ordering::Acquire) {
            return Err(OutboundError::Finished);
        }
        self.queue
            .put(message)
            .await
            .map_err(|_| OutboundError::Disconnected)
    }

    /// Blocking variant of [`write`](Self::write) for producer threads.
    pub fn blocking_write(&self, message: M) -> Result<(), OutboundError> {
        let _gate = self.gate.blocking_lock();
        if self.finished.load(Ordering::Acquire) {
            return Err(OutboundError::Finished);
        }
        self.queue
            .blocking_put(message)
            .map_err(|_| OutboundError::Disconnected)
    }

    /// Ends the stream after the messages already written. Calling it again
    /// does nothing.
    ///
    /// Writes are rejected from the first call on. If that call is cancelled
    /// before the end of the stream could be queued, the next call queues it.
    pub async fn finish(&self) {
        let mut ended = self.gate.lock().await;
        self.finished.store(true, Ordering::Release);
        if *ended {
            return;
        }
        if self.queue.finish().await.is_err() {
            tracing::debug!("outbound stream was dropped before it was finished");
        }
        *ended = true;
    }

    pub fn blocking_finish(&self) {
        let mut ended = self.gate.blocking_lock();
        self.finished.store(true, Ordering::Release);
        if *ended {
            return;
        }
        if self.queue.blocking_finish().is_err() {
            tracing::debug!("outbound stream was dropped before it was finished");
        }
        *ended = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingContext,
    Streaming,
    Finished,
}

/// Lazily produced, finite, non-restartable sequence of request messages.
pub struct OutboundStream<M> {
    state: State,
    context: Option<M>,
    queue: HandoffReceiver<M>,
}

// No field is ever pinned structurally.
impl<M> Unpin for OutboundStream<M> {}

impl<M> OutboundStream<M> {
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }
}

impl<M> Stream for OutboundStream<M> {
    type Item = M;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<M>> {
        let this = self.get_mut();
        match this.state {
            State::AwaitingContext => {
                this.state = State::Streaming;
                Poll::Ready(this.context.take())
            }
            State::Streaming => match this.queue.poll_get(cx) {
                Poll::Ready(Some(message)) => Poll::Ready(Some(message)),
                Poll::Ready(None) => {
                    this.state = State::Finished;
                    Poll::Ready(None)
                }
                Poll::Pending => Poll::Pending,
            },
            State::Finished => Poll::Ready(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diatheke_types::{AsrInput, TokenData};
    use futures::StreamExt;
    use std::time::Duration;

    fn token() -> TokenData {
        TokenData {
            data: b"state".to_vec(),
            id: "session-1".to_string(),
            metadata: String::new(),
        }
    }

    #[tokio::test]
    async fn test_context_first_then_writes_in_order() {
        let (sink, stream) = outbound(AsrInput::token(token()));
        let collector = tokio::spawn(stream.collect::<Vec<_>>());

        for chunk in [b"a".to_vec(), b"bc".to_vec(), b"def".to_vec()] {
            sink.write(AsrInput::audio(chunk)).await.unwrap();
        }
        sink.finish().await;

        let sent = collector.await.unwrap();
        assert_eq!(
            sent,
            vec![
                AsrInput::token(token()),
                AsrInput::audio(b"a".to_vec()),
                AsrInput::audio(b"bc".to_vec()),
                AsrInput::audio(b"def".to_vec()),
            ]
        );
    }

    #[tokio::test]
    async fn test_context_is_yielded_before_any_data_exists() {
        let (_sink, mut stream) = outbound("context");
        assert_eq!(stream.next().await, Some("context"));
        assert!(!stream.is_finished());
    }

    #[tokio::test]
    async fn test_finish_twice_matches_finish_once() {
        let (sink, stream) = outbound(0u32);
        let collector = tokio::spawn(stream.collect::<Vec<_>>());

        sink.write(1).await.unwrap();
        sink.finish().await;
        sink.finish().await;
        assert!(sink.is_finished());

        assert_eq!(collector.await.unwrap(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_write_after_finish_is_rejected() {
        let (sink, mut stream) = outbound(0u32);
        sink.finish().await;

        assert_eq!(sink.write(5).await, Err(OutboundError::Finished));
        assert_eq!(stream.next().await, Some(0));
        assert_eq!(stream.next().await, None);
        assert!(stream.is_finished());
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn test_cancelled_finish_is_retried() {
        let (sink, mut stream) = outbound(0u32);
        assert_eq!(stream.next().await, Some(0));
        sink.write(1).await.unwrap();

        let attempt = tokio::time::timeout(Duration::from_millis(20), sink.finish()).await;
        assert!(attempt.is_err(), "finish should wait for the full slot");
        assert!(sink.is_finished());
        assert_eq!(sink.write(2).await, Err(OutboundError::Finished));

        let collector = tokio::spawn(stream.collect::<Vec<_>>());
        sink.finish().await;
        assert_eq!(collector.await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_empty_payload_is_forwarded() {
        let (sink, stream) = outbound(AsrInput::token(token()));
        let collector = tokio::spawn(stream.collect::<Vec<_>>());

        sink.write(AsrInput::audio(Vec::new())).await.unwrap();
        sink.finish().await;

        let sent = collector.await.unwrap();
        assert_eq!(sent[1], AsrInput::audio(Vec::new()));
        assert_eq!(sent.len(), 2);
    }

    #[tokio::test]
    async fn test_write_after_transport_dropped_stream() {
        let (sink, stream) = outbound(0u32);
        drop(stream);
        assert_eq!(sink.write(1).await, Err(OutboundError::Disconnected));
        // finishing an abandoned stream is harmless
        sink.finish().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_writer_thread() {
        let (sink, stream) = outbound(0u32);
        let collector = tokio::spawn(stream.collect::<Vec<_>>());

        tokio::task::spawn_blocking(move || {
            for i in 1..=3 {
                sink.blocking_write(i).unwrap();
            }
            sink.blocking_finish();
        })
        .await
        .unwrap();

        assert_eq!(collector.await.unwrap(), vec![0, 1, 2, 3]);
    }
}
