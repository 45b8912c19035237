use std::collections::HashMap;

use crate::actions::{Action, ActionData};
use crate::audio::asr::AsrResult;

/// Opaque session state returned by the server after every update.
///
/// The client never inspects the contents. The latest token must be sent
/// back verbatim on the next update.
#[derive(Clone, PartialEq, Eq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct TokenData {
    #[prost(bytes = "vec", tag = "1")]
    pub data: Vec<u8>,
    #[prost(string, tag = "2")]
    pub id: String,
    #[prost(string, tag = "3")]
    pub metadata: String,
}

#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct SessionStart {
    #[prost(string, tag = "1")]
    pub model_id: String,
    /// Optional wakeword that overrides the model's default.
    #[prost(string, tag = "2")]
    pub wakeword: String,
}

impl SessionStart {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            wakeword: String::new(),
        }
    }

    pub fn with_wakeword(mut self, wakeword: &str) -> Self {
        self.wakeword = wakeword.to_string();
        self
    }
}

#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct SessionInput {
    #[prost(message, optional, tag = "1")]
    pub token: Option<TokenData>,
    #[prost(oneof = "session_input::Input", tags = "2, 3, 4, 5")]
    pub input: Option<session_input::Input>,
}

pub mod session_input {
    #[derive(Clone, PartialEq, ::prost::Oneof, serde::Serialize, serde::Deserialize)]
    pub enum Input {
        #[prost(message, tag = "2")]
        Text(super::TextInput),
        #[prost(message, tag = "3")]
        Asr(crate::audio::asr::AsrResult),
        #[prost(message, tag = "4")]
        Cmd(super::CommandResult),
        #[prost(message, tag = "5")]
        Story(super::SetStory),
    }
}

impl SessionInput {
    fn with_input(token: TokenData, input: session_input::Input) -> Self {
        Self {
            token: Some(token),
            input: Some(input),
        }
    }

    pub fn text(token: TokenData, text: &str) -> Self {
        Self::with_input(
            token,
            session_input::Input::Text(TextInput {
                text: text.to_string(),
            }),
        )
    }

    pub fn asr(token: TokenData, result: AsrResult) -> Self {
        Self::with_input(token, session_input::Input::Asr(result))
    }

    pub fn command(token: TokenData, result: CommandResult) -> Self {
        Self::with_input(token, session_input::Input::Cmd(result))
    }

    pub fn story(token: TokenData, story: SetStory) -> Self {
        Self::with_input(token, session_input::Input::Story(story))
    }
}

#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct TextInput {
    #[prost(string, tag = "1")]
    pub text: String,
}

/// Outcome of a command the server asked the application to run.
#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct CommandResult {
    /// Must match the `CommandAction` id.
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(map = "string, string", tag = "2")]
    pub out_parameters: HashMap<String, String>,
    /// Non-empty when the command failed.
    #[prost(string, tag = "3")]
    pub error: String,
}

impl CommandResult {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            out_parameters: HashMap::new(),
            error: String::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.out_parameters
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_error(mut self, error: &str) -> Self {
        self.error = error.to_string();
        self
    }
}

#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct SetStory {
    #[prost(string, tag = "1")]
    pub story_id: String,
    #[prost(map = "string, string", tag = "2")]
    pub parameters: HashMap<String, String>,
}

impl SetStory {
    pub fn new(story_id: &str) -> Self {
        Self {
            story_id: story_id.to_string(),
            parameters: HashMap::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.parameters.insert(key.to_string(), value.to_string());
        self
    }
}

/// Server response to a session create or update.
#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct SessionOutput {
    /// Replaces the token that was sent with the request.
    #[prost(message, optional, tag = "1")]
    pub token: Option<TokenData>,
    #[prost(message, repeated, tag = "2")]
    pub action_list: Vec<ActionData>,
}

impl SessionOutput {
    /// The actions to execute, in order, skipping entries with no action set.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.action_list.iter().filter_map(ActionData::action)
    }
}
