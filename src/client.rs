//! Blocking client for an OpenAI-compatible chat-completions API.

use crate::error::{Error, Result};
use crate::plan::RequestSpec;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// A chat message on the wire.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ChatMessage {
    /// Message role
    pub role: Role,
    /// Message text
    pub content: String,
}

/// Chat message role.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt
    System,
    /// End-user prompt
    #[default]
    User,
    /// Model output
    Assistant,
}

/// Request body for one completion call.
#[derive(Debug, Serialize, Clone)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Conversation, always a single `user` message here
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: f64,
    /// Nucleus sampling parameter
    pub top_p: f64,
    /// Completion token budget
    pub max_completion_tokens: u32,
}

impl ChatRequest {
    /// Builds the request body for a plan record and its composed prompt.
    #[must_use]
    pub fn for_spec(spec: &RequestSpec, prompt: impl Into<String>) -> Self {
        Self {
            model: spec.model.clone(),
            messages: vec![ChatMessage {
                role: Role::User,
                content: prompt.into(),
            }],
            temperature: spec.temperature,
            top_p: spec.top_p,
            max_completion_tokens: spec.max_completion_tokens,
        }
    }
}

/// Response body of a completion call.
#[derive(Debug, Deserialize, Default)]
pub struct ChatResponse {
    /// Returned completions
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// One returned completion.
#[derive(Debug, Deserialize, Default)]
pub struct Choice {
    /// The completion message
    #[serde(default)]
    pub message: ChatMessage,
}

impl ChatResponse {
    /// Consumes the response and returns the first completion's text.
    #[must_use]
    pub fn into_first_content(self) -> Option<String> {
        self.choices.into_iter().next().map(|c| c.message.content)
    }
}

/// Synchronous chat-completions client.
///
/// Constructed once at startup and passed to every call site; each call
/// blocks until the remote service responds. No retries.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: Client,
    api_base: String,
    api_key: String,
}

impl CompletionClient {
    /// Creates a client for the given API base URL and credential.
    ///
    /// The key is not checked here; an empty key fails with an
    /// authentication error on the first call.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::api(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Performs one completion call and returns the first choice's text.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status
    /// (including authentication failures), or a response without
    /// choices.
    pub fn complete(&self, request: &ChatRequest) -> Result<String> {
        let endpoint = format!("{}/chat/completions", self.api_base);
        debug!("POST {} (model={})", endpoint, request.model);

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::api(format!(
                "request failed with status {status}: {body}"
            )));
        }

        let completion: ChatResponse = response.json()?;
        completion
            .into_first_content()
            .ok_or_else(|| Error::api("response contained no choices"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::RequestSpec;
    use std::path::PathBuf;

    fn spec() -> RequestSpec {
        RequestSpec {
            content: "Write a tutorial about Docker.".to_string(),
            temperature: 0.7,
            top_p: 0.9,
            model: "deepseek-chat".to_string(),
            max_completion_tokens: 4096,
            path: PathBuf::from("out/docker.html"),
            title: "Docker".to_string(),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let request = ChatRequest::for_spec(&spec(), "prompt text");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["model"], "deepseek-chat");
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["top_p"], 0.9);
        assert_eq!(body["max_completion_tokens"], 4096);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "prompt text");
    }

    #[test]
    fn test_plan_role_is_ignored() {
        // the outgoing role is always `user`, whatever the plan said
        let request = ChatRequest::for_spec(&spec(), "p");
        assert_eq!(request.messages[0].role, Role::User);
    }

    #[test]
    fn test_response_first_content() {
        let raw = r#"{
            "id": "cmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "first"}},
                {"index": 1, "message": {"role": "assistant", "content": "second"}}
            ]
        }"#;

        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.into_first_content().unwrap(), "first");
    }

    #[test]
    fn test_response_without_choices() {
        let response: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_first_content().is_none());
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let client = CompletionClient::new(
            "https://api.example.com/",
            "key",
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(client.api_base, "https://api.example.com");
    }
}
