use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::session::Session;
use crate::stream::{AsrStream, TranscribeStream, TtsStream};
use crate::transport::{GrpcTransport, Transport};
use crate::types::{
    AsrResult, CommandResult, ModelInfo, ReplyAction, SessionInput, SessionOutput, SessionStart,
    SetStory, TokenData, TranscribeAction, VersionResponse,
};

mod config;
pub(crate) mod consts;
mod utils;

pub use config::{ClientIdentity, Config, ConfigBuilder, ConfigError};

/// Handle to a Diatheke server.
///
/// Cloning is cheap; every clone shares the same transport. All methods may
/// be called concurrently.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Opens a channel to the configured server.
    pub async fn connect(config: Config) -> Result<Self> {
        let endpoint = utils::build_endpoint(&config)?;
        let channel = endpoint.connect().await?;
        tracing::debug!("connected to {}", config.server_address());
        let transport = GrpcTransport::new(channel, config.request_timeout());
        Ok(Self::from_transport(Arc::new(transport)))
    }

    pub fn from_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn version(&self) -> Result<VersionResponse> {
        Ok(self.transport.version().await?)
    }

    /// Models available on the server, as listed in its configuration.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        Ok(self.transport.list_models().await?.models)
    }

    pub async fn create_session(&self, model_id: &str) -> Result<SessionOutput> {
        Ok(self
            .transport
            .create_session(SessionStart::new(model_id))
            .await?)
    }

    pub async fn create_session_with_wakeword(
        &self,
        model_id: &str,
        wakeword: &str,
    ) -> Result<SessionOutput> {
        let start = SessionStart::new(model_id).with_wakeword(wakeword);
        Ok(self.transport.create_session(start).await?)
    }

    /// Releases the session. The token must not be used afterwards.
    pub async fn delete_session(&self, token: TokenData) -> Result<()> {
        Ok(self.transport.delete_session(token).await?)
    }

    pub async fn process_text(&self, token: TokenData, text: &str) -> Result<SessionOutput> {
        self.update_session(SessionInput::text(token, text)).await
    }

    pub async fn process_asr_result(
        &self,
        token: TokenData,
        result: AsrResult,
    ) -> Result<SessionOutput> {
        self.update_session(SessionInput::asr(token, result)).await
    }

    /// Reports the outcome of a command action the server asked for.
    pub async fn process_command_result(
        &self,
        token: TokenData,
        result: CommandResult,
    ) -> Result<SessionOutput> {
        self.update_session(SessionInput::command(token, result))
            .await
    }

    /// Switches the session to another story.
    pub async fn set_story(
        &self,
        token: TokenData,
        story_id: &str,
        params: HashMap<String, String>,
    ) -> Result<SessionOutput> {
        let story = SetStory {
            story_id: story_id.to_string(),
            parameters: params,
        };
        self.update_session(SessionInput::story(token, story)).await
    }

    async fn update_session(&self, input: SessionInput) -> Result<SessionOutput> {
        Ok(self.transport.update_session(input).await?)
    }

    /// Starts speech recognition in the context of the given session token.
    ///
    /// The token is the first message on the stream. Must be called from
    /// within a tokio runtime.
    pub fn new_session_asr_stream(&self, token: TokenData) -> AsrStream {
        AsrStream::open(self.transport.clone(), token)
    }

    /// Starts synthesis of a reply action.
    pub async fn new_tts_stream(&self, reply: ReplyAction) -> Result<TtsStream> {
        let audio = self.transport.stream_tts(reply).await?;
        Ok(TtsStream::new(audio))
    }

    /// Starts a transcription stream for a transcribe action. Must be called
    /// from within a tokio runtime.
    pub fn new_transcribe_stream(&self, action: TranscribeAction) -> TranscribeStream {
        TranscribeStream::open(self.transport.clone(), action)
    }

    /// Binds `token` (usually from `create_session`) to a [`Session`].
    pub fn session(&self, token: TokenData) -> Session {
        Session::new(self.clone(), token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testing::{output_with_token, token, MockTransport};
    use crate::types::{ListModelsResponse, ModelInfo};

    fn client(mock: MockTransport) -> Client {
        Client::from_transport(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_list_models() {
        let mut mock = MockTransport::new();
        mock.expect_list_models().times(1).returning(|| {
            Ok(ListModelsResponse {
                models: vec![ModelInfo {
                    id: "1".to_string(),
                    name: "Restaurant".to_string(),
                    language: "en_US".to_string(),
                    asr_sample_rate: 16000,
                    tts_sample_rate: 22050,
                }],
            })
        });

        let models = client(mock).list_models().await.unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].asr_sample_rate, 16000);
    }

    #[tokio::test]
    async fn test_create_session_with_wakeword() {
        let mut mock = MockTransport::new();
        mock.expect_create_session()
            .withf(|start| start.model_id == "1" && start.wakeword == "computer")
            .times(1)
            .returning(|_| Ok(output_with_token("t1")));

        let output = client(mock)
            .create_session_with_wakeword("1", "computer")
            .await
            .unwrap();
        assert_eq!(output.token, Some(token("t1")));
    }

    #[tokio::test]
    async fn test_status_is_propagated() {
        let mut mock = MockTransport::new();
        mock.expect_version()
            .returning(|| Err(tonic::Status::unavailable("connection refused")));

        let err = client(mock).version().await.unwrap_err();
        assert!(matches!(err, Error::Status(s) if s.code() == tonic::Code::Unavailable));
    }

    #[tokio::test]
    async fn test_tts_stream_failure_is_reported_on_creation() {
        let mut mock = MockTransport::new();
        mock.expect_stream_tts()
            .returning(|_| Err(tonic::Status::not_found("no such voice")));

        let result = client(mock).new_tts_stream(ReplyAction::default()).await;
        assert!(matches!(result, Err(Error::Status(_))));
    }

    #[tokio::test]
    async fn test_session_starts_from_token() {
        let session = client(MockTransport::new()).session(token("t1"));
        assert_eq!(session.token().id, "t1");
    }
}
