//! The append-only conversation log.
//!
//! The log is the single source of truth for what the conversation shows. It
//! always holds at least the greeting, grows only at the end, and is replaced
//! wholesale only by [`ConversationLog::reset`]. Front-ends learn about changes
//! by subscribing a [`LogObserver`].

use std::fmt;

use crate::types::Message;

/// Greeting shown at the top of every conversation.
pub const DEFAULT_GREETING: &str = "Salut! Sunt USV Chat Bot. Cu ce pot sa te ajut astazi?";

/// Receives notifications when the conversation log changes.
///
/// Scrolling to the newest entry is a presentation concern: a renderer
/// implements this trait and brings each appended entry into view.
pub trait LogObserver: Send {
    /// Called after `message` was appended at position `index`.
    fn on_append(&mut self, index: usize, message: &Message);

    /// Called after the log was reset to only the greeting.
    fn on_reset(&mut self, greeting: &Message) {
        _ = greeting;
    }
}

/// Ordered record of every message exchanged in this session.
pub struct ConversationLog {
    greeting: Message,
    messages: Vec<Message>,
    observers: Vec<Box<dyn LogObserver>>,
}

impl ConversationLog {
    /// Creates a log holding the default greeting.
    pub fn new() -> Self {
        Self::with_greeting(DEFAULT_GREETING)
    }

    /// Creates a log whose first entry is a bot message with `greeting`.
    pub fn with_greeting<S: Into<String>>(greeting: S) -> Self {
        let greeting = Message::bot(greeting);
        Self {
            messages: vec![greeting.clone()],
            greeting,
            observers: Vec::new(),
        }
    }

    /// Registers an observer for append and reset notifications.
    pub fn subscribe(&mut self, observer: Box<dyn LogObserver>) {
        self.observers.push(observer);
    }

    /// Adds `message` at the end and returns its index.
    pub(crate) fn append(&mut self, message: Message) -> usize {
        let index = self.messages.len();
        self.messages.push(message);
        let message = &self.messages[index];
        for observer in self.observers.iter_mut() {
            observer.on_append(index, message);
        }
        index
    }

    /// Replaces the whole conversation with the greeting.
    pub(crate) fn reset(&mut self) {
        self.messages = vec![self.greeting.clone()];
        for observer in self.observers.iter_mut() {
            observer.on_reset(&self.greeting);
        }
    }

    /// The greeting entry.
    pub fn greeting(&self) -> &Message {
        &self.greeting
    }

    /// Number of entries, including the greeting.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: the greeting is never removed.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the entry at `index`.
    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    /// Returns the newest entry.
    pub fn last(&self) -> &Message {
        self.messages.last().unwrap_or(&self.greeting)
    }

    /// All entries in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Iterates over entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConversationLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationLog")
            .field("messages", &self.messages)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<'a> IntoIterator for &'a ConversationLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl LogObserver for Recorder {
        fn on_append(&mut self, index: usize, message: &Message) {
            self.0
                .lock()
                .unwrap()
                .push(format!("append {index} {}", message.text));
        }

        fn on_reset(&mut self, greeting: &Message) {
            self.0
                .lock()
                .unwrap()
                .push(format!("reset {}", greeting.text));
        }
    }

    #[test]
    fn starts_with_greeting() {
        let log = ConversationLog::new();
        assert_eq!(log.len(), 1);
        assert!(!log.is_empty());
        assert_eq!(log.last(), &Message::bot(DEFAULT_GREETING));
        assert_eq!(log.greeting().text, DEFAULT_GREETING);
    }

    #[test]
    fn append_preserves_order() {
        let mut log = ConversationLog::with_greeting("hi");
        assert_eq!(log.append(Message::user("a")), 1);
        assert_eq!(log.append(Message::bot("b")), 2);
        let texts: Vec<&str> = log.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["hi", "a", "b"]);
        assert_eq!(log.get(1), Some(&Message::user("a")));
        assert_eq!(log.get(3), None);
    }

    #[test]
    fn reset_leaves_only_greeting() {
        let mut log = ConversationLog::with_greeting("hi");
        for i in 0..5 {
            log.append(Message::user(format!("m{i}")));
        }
        log.reset();
        assert_eq!(log.messages(), &[Message::bot("hi")]);
    }

    #[test]
    fn observers_see_every_mutation() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut log = ConversationLog::with_greeting("hi");
        log.subscribe(Box::new(Recorder(Arc::clone(&events))));
        log.append(Message::user("Salut"));
        log.append(Message::bot("Buna ziua!"));
        log.reset();
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "append 1 Salut".to_string(),
                "append 2 Buna ziua!".to_string(),
                "reset hi".to_string(),
            ]
        );
    }
}
