//! Append-only message log for one session.

use super::message::Message;

/// Ordered record of everything said in a session.
///
/// Messages are never reordered, edited, deduplicated, or removed.
#[derive(Debug, Clone, Default)]
pub struct TranscriptStore {
    messages: Vec<Message>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message at the end.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// All messages in insertion order.
    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    /// Messages appended at or after `index`.
    pub fn messages_since(&self, index: usize) -> &[Message] {
        self.messages.get(index..).unwrap_or(&[])
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::message::MessageBody;

    fn filled() -> TranscriptStore {
        let mut store = TranscriptStore::new();
        store.append(Message::user("one").unwrap());
        store.append(Message::bot(MessageBody::text("two")).unwrap());
        store.append(Message::user("three").unwrap());
        store
    }

    #[test]
    fn starts_empty() {
        let store = TranscriptStore::new();
        assert!(store.is_empty());
        assert!(store.last().is_none());
    }

    #[test]
    fn keeps_insertion_order() {
        let store = filled();
        let texts: Vec<&str> = store.all().iter().map(Message::text).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn all_is_idempotent() {
        let store = filled();
        assert_eq!(store.all(), store.all());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn identical_messages_are_not_deduplicated() {
        let mut store = TranscriptStore::new();
        let msg = Message::user("same").unwrap();
        store.append(msg.clone());
        store.append(msg);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn messages_since_returns_tail() {
        let store = filled();
        assert_eq!(store.messages_since(2).len(), 1);
        assert_eq!(store.messages_since(3).len(), 0);
        assert_eq!(store.messages_since(10).len(), 0);
        assert_eq!(store.last().map(Message::text), Some("three"));
    }
}
