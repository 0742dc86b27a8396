use super::message::Message;
use crate::Error;
use serde::{Deserialize, Serialize};

/// Model used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_completion_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 1.0,
            max_completion_tokens: 1024,
        }
    }
}

/// Model and sampling settings shared by every request built from a conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestTemplate {
    pub model: String,
    pub sampling: SamplingParams,
}

impl RequestTemplate {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            sampling: SamplingParams::default(),
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    /// Build a request for the given messages.
    pub fn build(&self, messages: Vec<Message>) -> Result<ChatRequest, Error> {
        ChatRequest::new(self.model.clone(), messages, self.sampling)
    }
}

impl Default for RequestTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

/// A single chat-completion request.
///
/// Built fresh per submission and not modified afterwards. Streaming is
/// implied: the client always asks the endpoint for a streamed body.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    sampling: SamplingParams,
}

impl ChatRequest {
    /// Create a request, rejecting an empty message list.
    pub fn new(
        model: impl Into<String>,
        messages: Vec<Message>,
        sampling: SamplingParams,
    ) -> Result<Self, Error> {
        if messages.is_empty() {
            return Err(Error::invalid_request(
                "a request needs at least one message",
            ));
        }
        let model = model.into();
        if model.trim().is_empty() {
            return Err(Error::invalid_request("model identifier is empty"));
        }
        Ok(Self {
            model,
            messages,
            sampling,
        })
    }

    /// Single user question with the default model and sampling.
    pub fn user(question: impl Into<String>) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            messages: vec![Message::user(question)],
            sampling: SamplingParams::default(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn sampling(&self) -> SamplingParams {
        self.sampling
    }
}
