use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout")]
    pub request_timeout: u64,
    #[serde(default = "default_typing_interval")]
    pub typing_interval_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

const fn default_timeout() -> u64 {
    600
}

const fn default_typing_interval() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            api_key_env: default_api_key_env(),
            request_timeout: default_timeout(),
            typing_interval_ms: default_typing_interval(),
            export_dir: None,
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_constructors() {
        let sys = ChatMessage::system("rules");
        assert_eq!(sys.role, ChatRole::System);
        assert_eq!(sys.content, "rules");

        let user = ChatMessage::user("A man walks into a bar.");
        assert_eq!(user.role, ChatRole::User);
        assert_eq!(user.content, "A man walks into a bar.");
    }

    #[test]
    fn test_chat_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::system("x")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"x"}"#);
        let json = serde_json::to_string(&ChatMessage::user("y")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"y"}"#);
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.typing_interval_ms, 10);
        assert!(config.export_dir.is_none());
    }

    #[test]
    fn test_app_config_fills_missing_optional_fields() {
        let config: AppConfig = toml::from_str(
            r#"
            api_base_url = "http://localhost:8080/v1"
            model = "gpt-4o-mini"
            "#,
        )
        .unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.request_timeout, 600);
        assert_eq!(config.typing_interval_ms, 10);
        assert_eq!(config.log_level, "info");
    }
}
