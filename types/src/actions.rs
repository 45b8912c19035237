use std::collections::HashMap;

/// One entry of a session's action list.
#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct ActionData {
    #[prost(oneof = "Action", tags = "1, 2, 3, 4")]
    pub action: Option<Action>,
}

/// What the server wants the application to do next.
#[derive(Clone, PartialEq, ::prost::Oneof, serde::Serialize, serde::Deserialize)]
pub enum Action {
    /// Wait for user input (text or audio) and send it back.
    #[prost(message, tag = "1")]
    Input(WaitForUserAction),
    /// Run a command and report the outcome with a `CommandResult`.
    #[prost(message, tag = "2")]
    Command(CommandAction),
    /// Speak (or display) a reply; audio comes from a TTS stream.
    #[prost(message, tag = "3")]
    Reply(ReplyAction),
    /// Transcribe audio with a dedicated stream, outside the dialog.
    #[prost(message, tag = "4")]
    Transcribe(TranscribeAction),
}

impl ActionData {
    pub fn new(action: Action) -> Self {
        Self {
            action: Some(action),
        }
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }
}

#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct WaitForUserAction {
    #[prost(bool, tag = "1")]
    pub requires_wake_word: bool,
    /// The user is expected to answer right away (e.g. a follow-up question).
    #[prost(bool, tag = "2")]
    pub immediate: bool,
}

#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct CommandAction {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(map = "string, string", tag = "2")]
    pub input_parameters: HashMap<String, String>,
}

#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct ReplyAction {
    #[prost(string, tag = "1")]
    pub text: String,
    #[prost(string, tag = "2")]
    pub luna_model: String,
}

#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct TranscribeAction {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub cubic_model_id: String,
    #[prost(string, tag = "3")]
    pub diatheke_model_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionOutput;

    #[test]
    fn test_actions_skip_empty_entries() {
        let output = SessionOutput {
            token: None,
            action_list: vec![
                ActionData::new(Action::Reply(ReplyAction {
                    text: "hi".to_string(),
                    luna_model: "1".to_string(),
                })),
                ActionData { action: None },
                ActionData::new(Action::Input(WaitForUserAction {
                    requires_wake_word: false,
                    immediate: true,
                })),
            ],
        };

        let actions: Vec<&Action> = output.actions().collect();
        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[0], Action::Reply(r) if r.text == "hi"));
        assert!(matches!(actions[1], Action::Input(w) if w.immediate));
    }

    #[test]
    fn test_serialize() {
        let action = Action::Command(CommandAction {
            id: "lights".to_string(),
            input_parameters: HashMap::from([("room".to_string(), "den".to_string())]),
        });
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"Command":{"id":"lights","input_parameters":{"room":"den"}}}"#);

        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }
}
