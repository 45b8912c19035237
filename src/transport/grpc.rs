use std::time::Duration;

use async_trait::async_trait;
use diatheke_types::{
    AsrInput, AsrResult, Empty, ListModelsResponse, ReplyAction, SessionInput, SessionOutput,
    SessionStart, TokenData, TranscribeInput, TranscribeResult, TtsAudio, VersionResponse,
};
use futures::StreamExt;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::{Request, Status};

use super::{ResponseStream, Transport};
use crate::stream::OutboundStream;

const VERSION: &str = "/cobaltspeech.diatheke.Diatheke/Version";
const LIST_MODELS: &str = "/cobaltspeech.diatheke.Diatheke/ListModels";
const CREATE_SESSION: &str = "/cobaltspeech.diatheke.Diatheke/CreateSession";
const DELETE_SESSION: &str = "/cobaltspeech.diatheke.Diatheke/DeleteSession";
const UPDATE_SESSION: &str = "/cobaltspeech.diatheke.Diatheke/UpdateSession";
const STREAM_ASR: &str = "/cobaltspeech.diatheke.Diatheke/StreamASR";
const STREAM_TTS: &str = "/cobaltspeech.diatheke.Diatheke/StreamTTS";
const TRANSCRIBE: &str = "/cobaltspeech.diatheke.Diatheke/Transcribe";

/// [`Transport`] over a tonic channel.
///
/// The channel is cloned for every call, so one transport can serve any
/// number of concurrent calls and streams.
#[derive(Clone)]
pub struct GrpcTransport {
    inner: Grpc<Channel>,
    request_timeout: Option<Duration>,
}

impl GrpcTransport {
    /// `request_timeout` applies to unary calls only; streams run until
    /// either side closes them.
    pub fn new(channel: Channel, request_timeout: Option<Duration>) -> Self {
        Self {
            inner: Grpc::new(channel),
            request_timeout,
        }
    }

    async fn ready(&self) -> Result<Grpc<Channel>, Status> {
        let mut grpc = self.inner.clone();
        grpc.ready()
            .await
            .map_err(|e| Status::unavailable(format!("service was not ready: {e}")))?;
        Ok(grpc)
    }

    async fn unary<Req, Resp>(&self, message: Req, path: &'static str) -> Result<Resp, Status>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut grpc = self.ready().await?;
        let mut request = Request::new(message);
        if let Some(timeout) = self.request_timeout {
            request.set_timeout(timeout);
        }
        let response = grpc
            .unary(
                request,
                PathAndQuery::from_static(path),
                ProstCodec::<Req, Resp>::default(),
            )
            .await?;
        Ok(response.into_inner())
    }
}

#[async_trait]
impl Transport for GrpcTransport {
    async fn version(&self) -> Result<VersionResponse, Status> {
        self.unary(Empty {}, VERSION).await
    }

    async fn list_models(&self) -> Result<ListModelsResponse, Status> {
        self.unary(Empty {}, LIST_MODELS).await
    }

    async fn create_session(&self, start: SessionStart) -> Result<SessionOutput, Status> {
        self.unary(start, CREATE_SESSION).await
    }

    async fn delete_session(&self, token: TokenData) -> Result<(), Status> {
        let _: Empty = self.unary(token, DELETE_SESSION).await?;
        Ok(())
    }

    async fn update_session(&self, input: SessionInput) -> Result<SessionOutput, Status> {
        self.unary(input, UPDATE_SESSION).await
    }

    async fn stream_asr(&self, requests: OutboundStream<AsrInput>) -> Result<AsrResult, Status> {
        let mut grpc = self.ready().await?;
        let response = grpc
            .client_streaming(
                Request::new(requests),
                PathAndQuery::from_static(STREAM_ASR),
                ProstCodec::<AsrInput, AsrResult>::default(),
            )
            .await?;
        Ok(response.into_inner())
    }

    async fn stream_tts(&self, reply: ReplyAction) -> Result<ResponseStream<TtsAudio>, Status> {
        let mut grpc = self.ready().await?;
        let response = grpc
            .server_streaming(
                Request::new(reply),
                PathAndQuery::from_static(STREAM_TTS),
                ProstCodec::<ReplyAction, TtsAudio>::default(),
            )
            .await?;
        Ok(response.into_inner().boxed())
    }

    async fn transcribe(
        &self,
        requests: OutboundStream<TranscribeInput>,
    ) -> Result<ResponseStream<TranscribeResult>, Status> {
        let mut grpc = self.ready().await?;
        let response = grpc
            .streaming(
                Request::new(requests),
                PathAndQuery::from_static(TRANSCRIBE),
                ProstCodec::<TranscribeInput, TranscribeResult>::default(),
            )
            .await?;
        Ok(response.into_inner().boxed())
    }
}
