//! Convenience loops between the stream handles and async readers/writers.

use diatheke_types::{AsrResult, TranscribeResult};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::{AsrStream, TranscribeStream, TtsStream};
use crate::error::{Error, Result};

/// Sends audio from `reader` in chunks of up to `buff_size` bytes until EOF
/// or until the server stops listening, then returns the result.
pub async fn read_asr_audio<R>(
    stream: &AsrStream,
    mut reader: R,
    buff_size: usize,
) -> Result<AsrResult>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; buff_size.max(1)];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        if !stream.send_audio(&buf[..n]).await {
            tracing::debug!("asr stream stopped accepting audio before EOF");
            break;
        }
    }
    stream.result().await
}

/// Sends audio from `reader` while handing every result to `on_result`.
///
/// The audio is finished at EOF. Returns once the server has delivered its
/// last result.
pub async fn read_transcribe_audio<R, F>(
    stream: &TranscribeStream,
    mut reader: R,
    buff_size: usize,
    mut on_result: F,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    F: FnMut(TranscribeResult),
{
    let send = async {
        let sent = send_transcribe_audio(stream, &mut reader, buff_size).await;
        stream.send_finished().await;
        sent
    };
    let receive = async {
        while let Some(result) = stream.receive_result().await? {
            on_result(result);
        }
        Ok::<_, Error>(())
    };

    let (sent, received) = tokio::join!(send, receive);
    received?;
    sent
}

async fn send_transcribe_audio<R>(
    stream: &TranscribeStream,
    reader: &mut R,
    buff_size: usize,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; buff_size.max(1)];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 || !stream.send_audio(&buf[..n]).await? {
            return Ok(());
        }
    }
}

/// Writes every chunk of synthesized audio to `writer`, then flushes it.
pub async fn write_tts_audio<W>(stream: &mut TtsStream, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(audio) = stream.receive_audio().await? {
        writer.write_all(&audio).await?;
    }
    writer.flush().await?;
    Ok(())
}
