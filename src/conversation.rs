//! Caller-owned conversation history.

use crate::types::{ChatRequest, Message, RequestTemplate};
use crate::Error;

/// History of earlier exchanges, passed explicitly into each request.
///
/// Nothing is recorded automatically: after a successful completion the
/// caller stores the exchange with [`Conversation::save`].
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    system: Option<Message>,
    history: Vec<Message>,
    max_exchanges: Option<usize>,
}

impl Conversation {
    /// Create a new empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a system preamble sent ahead of every exchange.
    pub fn with_system(mut self, content: impl Into<String>) -> Self {
        self.system = Some(Message::system(content));
        self
    }

    /// Keep at most `max` exchanges; older ones are dropped first.
    pub fn with_max_exchanges(mut self, max: usize) -> Self {
        self.max_exchanges = Some(max);
        self.truncate();
        self
    }

    /// Messages to send ahead of the next question.
    pub fn load(&self) -> Vec<Message> {
        self.system
            .iter()
            .chain(self.history.iter())
            .cloned()
            .collect()
    }

    /// Build a request for `question` on top of the stored history.
    pub fn request_for(
        &self,
        question: impl Into<String>,
        template: &RequestTemplate,
    ) -> Result<ChatRequest, Error> {
        let mut messages = self.load();
        messages.push(Message::user(question));
        template.build(messages)
    }

    /// Record one completed exchange.
    pub fn save(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.history.push(Message::user(question));
        self.history.push(Message::assistant(answer));
        self.truncate();
    }

    /// Forget every exchange, keeping the system preamble.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Number of stored exchanges.
    pub fn len(&self) -> usize {
        self.history.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    fn truncate(&mut self) {
        if let Some(max) = self.max_exchanges {
            let keep = max.saturating_mul(2);
            if self.history.len() > keep {
                let excess = self.history.len() - keep;
                self.history.drain(..excess);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn test_request_includes_history() {
        let mut conversation = Conversation::new().with_system("Be brief.");
        conversation.save("Hi", "Hello!");

        let request = conversation
            .request_for("How are you?", &RequestTemplate::default())
            .unwrap();
        let roles: Vec<Role> = request.messages().iter().map(|m| m.role()).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(request.messages()[3].content(), Some("How are you?"));
    }

    #[test]
    fn test_request_for_does_not_mutate() {
        let conversation = Conversation::new();
        let _ = conversation
            .request_for("question", &RequestTemplate::default())
            .unwrap();
        assert!(conversation.is_empty());
        assert!(conversation.load().is_empty());
    }

    #[test]
    fn test_window_drops_oldest_exchange() {
        let mut conversation = Conversation::new()
            .with_system("sys")
            .with_max_exchanges(2);
        conversation.save("q1", "a1");
        conversation.save("q2", "a2");
        conversation.save("q3", "a3");

        assert_eq!(conversation.len(), 2);
        let messages = conversation.load();
        assert_eq!(messages[0], Message::system("sys"));
        assert_eq!(messages[1], Message::user("q2"));
        assert_eq!(messages[4], Message::assistant("a3"));
    }

    #[test]
    fn test_unbounded_window_keeps_everything() {
        let mut conversation = Conversation::new().with_max_exchanges(usize::MAX);
        conversation.save("q1", "a1");
        conversation.save("q2", "a2");
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.load()[0], Message::user("q1"));
    }

    #[test]
    fn test_clear_keeps_system() {
        let mut conversation = Conversation::new().with_system("sys");
        conversation.save("q", "a");
        conversation.clear();
        assert!(conversation.is_empty());
        assert_eq!(conversation.load(), vec![Message::system("sys")]);
    }
}
