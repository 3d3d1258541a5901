use serde::{Deserialize, Serialize};

/// Language-model backend the server should use when generating a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAI,
    Ollama,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "openai",
            LlmProvider::Ollama => "ollama",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Some(LlmProvider::OpenAI),
            "ollama" => Some(LlmProvider::Ollama),
            _ => None,
        }
    }

    pub fn all() -> Vec<LlmProvider> {
        vec![LlmProvider::OpenAI, LlmProvider::Ollama]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "OpenAI",
            LlmProvider::Ollama => "Ollama",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            LlmProvider::OpenAI => LlmProvider::Ollama,
            LlmProvider::Ollama => LlmProvider::OpenAI,
        }
    }
}

/// Kind of outreach text to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    #[default]
    ConnectionRequest,
    FollowUp,
    ViralPost,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::ConnectionRequest => "connection_request",
            MessageType::FollowUp => "follow_up",
            MessageType::ViralPost => "viral_post",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "connection_request" => Some(MessageType::ConnectionRequest),
            "follow_up" => Some(MessageType::FollowUp),
            "viral_post" => Some(MessageType::ViralPost),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MessageType::ConnectionRequest => "Connection Request",
            MessageType::FollowUp => "Follow Up",
            MessageType::ViralPost => "Viral Post",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            MessageType::ConnectionRequest => MessageType::FollowUp,
            MessageType::FollowUp => MessageType::ViralPost,
            MessageType::ViralPost => MessageType::ConnectionRequest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_round_trips_through_str() {
        for provider in LlmProvider::all() {
            assert_eq!(LlmProvider::from_str(provider.as_str()), Some(provider));
        }
        assert_eq!(LlmProvider::from_str("OpenAI"), Some(LlmProvider::OpenAI));
        assert_eq!(LlmProvider::from_str("claude"), None);
    }

    #[test]
    fn test_provider_serializes_lowercase() {
        let json = serde_json::to_string(&LlmProvider::OpenAI).unwrap();
        assert_eq!(json, "\"openai\"");
    }

    #[test]
    fn test_message_type_cycles_through_all_kinds() {
        let start = MessageType::ConnectionRequest;
        assert_eq!(start.next(), MessageType::FollowUp);
        assert_eq!(start.next().next(), MessageType::ViralPost);
        assert_eq!(start.next().next().next(), start);
    }

    #[test]
    fn test_message_type_wire_name() {
        let json = serde_json::to_string(&MessageType::FollowUp).unwrap();
        assert_eq!(json, "\"follow_up\"");
        assert_eq!(MessageType::from_str("viral_post"), Some(MessageType::ViralPost));
    }
}
