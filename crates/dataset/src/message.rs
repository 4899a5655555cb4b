use serde::{Deserialize, Serialize};

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system" => Some(Self::System),
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single chat turn. The role stays a raw string so that files with
/// roles we don't template (e.g. `tool`) still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System.as_str(), content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User.as_str(), content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant.as_str(), content)
    }

    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

/// One line of the source JSONL file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// One line of an mlx-lm `train.jsonl` / `valid.jsonl` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_messages_field_is_empty() {
        let ex: TrainingExample = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert!(ex.messages.is_empty());
    }

    #[test]
    fn unknown_roles_still_deserialize() {
        let ex: TrainingExample =
            serde_json::from_str(r#"{"messages":[{"role":"tool","content":"42"}]}"#).unwrap();
        assert_eq!(ex.messages[0].role(), None);
    }

    #[test]
    fn role_names_round_trip() {
        for role in [Role::System, Role::User, Role::Assistant] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("Assistant"), None);
    }
}
