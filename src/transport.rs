//! The RPC surface the client is built on.
//!
//! [`Transport`] has one method per Diatheke RPC, shaped by call kind: unary
//! calls take and return a message, the client-streaming call pulls from an
//! [`OutboundStream`], and server-streaming calls hand back a
//! [`ResponseStream`]. [`GrpcTransport`] is the production binding; other
//! bindings (or test doubles) can be plugged into
//! [`Client::from_transport`](crate::Client::from_transport).

mod grpc;

use async_trait::async_trait;
use diatheke_types::{
    AsrInput, AsrResult, ListModelsResponse, ReplyAction, SessionInput, SessionOutput,
    SessionStart, TokenData, TranscribeInput, TranscribeResult, TtsAudio, VersionResponse,
};
use futures::stream::BoxStream;
use tonic::Status;

use crate::stream::OutboundStream;

pub use grpc::GrpcTransport;

/// Messages received on the server half of a streaming call.
pub type ResponseStream<T> = BoxStream<'static, Result<T, Status>>;

#[async_trait]
pub trait Transport: Send + Sync {
    async fn version(&self) -> Result<VersionResponse, Status>;

    async fn list_models(&self) -> Result<ListModelsResponse, Status>;

    async fn create_session(&self, start: SessionStart) -> Result<SessionOutput, Status>;

    async fn delete_session(&self, token: TokenData) -> Result<(), Status>;

    async fn update_session(&self, input: SessionInput) -> Result<SessionOutput, Status>;

    /// Client-streaming: sends every request, returns the single result.
    ///
    /// Implementations must drop `requests` once the call has ended so that
    /// blocked writers are released.
    async fn stream_asr(&self, requests: OutboundStream<AsrInput>) -> Result<AsrResult, Status>;

    /// Server-streaming: audio for the reply, until synthesis is complete.
    async fn stream_tts(&self, reply: ReplyAction) -> Result<ResponseStream<TtsAudio>, Status>;

    /// Bidirectional: both halves run and close independently.
    async fn transcribe(
        &self,
        requests: OutboundStream<TranscribeInput>,
    ) -> Result<ResponseStream<TranscribeResult>, Status>;
}
