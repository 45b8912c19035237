use std::pin::Pin;
use std::task::{Context, Poll};

use diatheke_types::TtsAudio;
use futures::{Stream, StreamExt};

use crate::error::{Error, Result};
use crate::transport::ResponseStream;

/// Synthesized audio for a reply action, chunk by chunk.
pub struct TtsStream {
    audio: ResponseStream<TtsAudio>,
    finished: bool,
}

impl TtsStream {
    pub(crate) fn new(audio: ResponseStream<TtsAudio>) -> Self {
        Self {
            audio,
            finished: false,
        }
    }

    /// Next chunk of audio, or `None` once synthesis is complete.
    pub async fn receive_audio(&mut self) -> Result<Option<Vec<u8>>> {
        self.next().await.transpose()
    }
}

impl Stream for TtsStream {
    type Item = Result<Vec<u8>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }
        match this.audio.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(chunk))) => Poll::Ready(Some(Ok(chunk.audio))),
            Poll::Ready(Some(Err(status))) => {
                this.finished = true;
                Poll::Ready(Some(Err(Error::Status(status))))
            }
            Poll::Ready(None) => {
                this.finished = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use tonic::Status;

    fn chunks(items: Vec<std::result::Result<TtsAudio, Status>>) -> TtsStream {
        TtsStream::new(stream::iter(items).boxed())
    }

    fn audio(bytes: &[u8]) -> TtsAudio {
        TtsAudio {
            audio: bytes.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_receive_until_complete() {
        let mut tts = chunks(vec![Ok(audio(b"RIFF")), Ok(audio(b"data"))]);
        assert_eq!(tts.receive_audio().await.unwrap(), Some(b"RIFF".to_vec()));
        assert_eq!(tts.receive_audio().await.unwrap(), Some(b"data".to_vec()));
        assert_eq!(tts.receive_audio().await.unwrap(), None);
        assert_eq!(tts.receive_audio().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_error_ends_the_stream() {
        let mut tts = chunks(vec![
            Ok(audio(b"a")),
            Err(Status::aborted("synthesis aborted")),
            Ok(audio(b"never")),
        ]);
        assert_eq!(tts.receive_audio().await.unwrap(), Some(b"a".to_vec()));
        assert!(tts.receive_audio().await.is_err());
        assert_eq!(tts.receive_audio().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_usable_as_stream() {
        let tts = chunks(vec![Ok(audio(b"1")), Ok(audio(b"")), Ok(audio(b"3"))]);
        let collected: Vec<Vec<u8>> = tts.map(|chunk| chunk.unwrap()).collect().await;
        assert_eq!(collected, vec![b"1".to_vec(), Vec::new(), b"3".to_vec()]);
    }
}
