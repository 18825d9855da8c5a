use serde::{Deserialize, Serialize};

/// A single entry in the conversation log.
///
/// Messages carry no identifier; consumers refer to them by their position in the log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// The text shown for this entry.
    pub text: String,

    /// Whether the user (rather than the bot) authored this entry.
    pub is_user: bool,
}

impl Message {
    /// Creates a message authored by the user.
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            is_user: true,
        }
    }

    /// Creates a message authored by the bot.
    pub fn bot<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            is_user: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_author() {
        assert!(Message::user("Salut").is_user);
        assert!(!Message::bot("Buna ziua!").is_user);
        assert_eq!(Message::bot("Buna ziua!").text, "Buna ziua!");
    }
}
