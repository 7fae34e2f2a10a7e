//! Conversation state.

use std::future::Future;

use tracing::debug;

use crate::Result;
use crate::backend::{ChatRequest, LlmBackend, Message};

/// A stateful chat: each message is answered in the context of the ones
/// before it.
pub trait ChatSession: Send {
    /// Send one user message and return the reply text.
    fn send_message(&mut self, text: &str) -> impl Future<Output = Result<String>> + Send;
}

/// A conversation with an LLM backend.
///
/// Owns the message history. A failed request leaves the history as it was.
pub struct Conversation<B> {
    backend: B,
    messages: Vec<Message>,
    system: Option<String>,
}

impl<B: LlmBackend> Conversation<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            messages: Vec::new(),
            system: None,
        }
    }

    /// Set the system prompt.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Messages exchanged so far, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.messages
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: LlmBackend> ChatSession for Conversation<B> {
    async fn send_message(&mut self, text: &str) -> Result<String> {
        let user = Message::user(text);

        // History is only touched once the reply is in hand, so an error or a
        // dropped future leaves it as it was.
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.extend_from_slice(&self.messages);
        messages.push(user.clone());

        let request = ChatRequest {
            messages: &messages,
            system: self.system.as_deref(),
        };
        let response = self.backend.chat(request).await?;

        debug!(
            history = self.messages.len() + 2,
            tokens = response.usage.total_tokens(),
            "model replied"
        );
        self.messages.push(user);
        self.messages.push(Message::assistant(response.content.clone()));
        Ok(response.content)
    }
}
