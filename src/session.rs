use std::collections::HashMap;

use diatheke_types::{
    AsrResult, CommandResult, ReplyAction, SessionOutput, TokenData, TranscribeAction,
};

use crate::client::Client;
use crate::error::Result;
use crate::stream::{AsrStream, TranscribeStream, TtsStream};

/// A session bound to its current token.
///
/// Every update sends the token from the previous response, so callers only
/// have to act on the returned actions.
pub struct Session {
    client: Client,
    token: TokenData,
}

impl Session {
    pub(crate) fn new(client: Client, token: TokenData) -> Self {
        Self { client, token }
    }

    pub fn token(&self) -> &TokenData {
        &self.token
    }

    pub async fn process_text(&mut self, text: &str) -> Result<SessionOutput> {
        let output = self.client.process_text(self.token.clone(), text).await?;
        Ok(self.advance(output))
    }

    pub async fn process_asr_result(&mut self, result: AsrResult) -> Result<SessionOutput> {
        let output = self
            .client
            .process_asr_result(self.token.clone(), result)
            .await?;
        Ok(self.advance(output))
    }

    pub async fn process_command_result(
        &mut self,
        result: CommandResult,
    ) -> Result<SessionOutput> {
        let output = self
            .client
            .process_command_result(self.token.clone(), result)
            .await?;
        Ok(self.advance(output))
    }

    pub async fn set_story(
        &mut self,
        story_id: &str,
        params: HashMap<String, String>,
    ) -> Result<SessionOutput> {
        let output = self
            .client
            .set_story(self.token.clone(), story_id, params)
            .await?;
        Ok(self.advance(output))
    }

    /// Audio input seeded with the current token. Feed the result to
    /// [`process_asr_result`](Self::process_asr_result).
    pub fn new_asr_stream(&self) -> AsrStream {
        self.client.new_session_asr_stream(self.token.clone())
    }

    pub async fn new_tts_stream(&self, reply: ReplyAction) -> Result<TtsStream> {
        self.client.new_tts_stream(reply).await
    }

    pub fn new_transcribe_stream(&self, action: TranscribeAction) -> TranscribeStream {
        self.client.new_transcribe_stream(action)
    }

    /// Ends the session on the server.
    pub async fn delete(self) -> Result<()> {
        self.client.delete_session(self.token).await
    }

    fn advance(&mut self, output: SessionOutput) -> SessionOutput {
        match &output.token {
            Some(token) => self.token = token.clone(),
            None => tracing::warn!(
                "session {} update returned no token, keeping the previous one",
                self.token.id
            ),
        }
        output
    }
}
