//! Canned-answer help desk. Replies are plain data: a built-in table merged
//! with whatever the module configuration adds.

use std::collections::HashMap;

use crate::config::ChatConfig;

const DEFAULT_FALLBACK: &str =
    "Sorry, I didn't understand that. Try asking about appointments, hours or your account.";

const DEFAULT_REPLIES: &[(&str, &str)] = &[
    ("hi", "Hello! How can I help you with your appointment today?"),
    ("hello", "Hello! How can I help you with your appointment today?"),
    ("good morning", "Good morning! How can I help you today?"),
    ("good afternoon", "Good afternoon! How can I help you today?"),
    (
        "how do i book an appointment",
        "Create a schedule with a title and a reason. Date and time are optional.",
    ),
    (
        "how do i cancel my appointment",
        "Delete the schedule using its id.",
    ),
    (
        "can i change my appointment",
        "Yes. Update the schedule with the new date, time, title or reason.",
    ),
    (
        "how do i create an account",
        "Register with your full name, username, password and address.",
    ),
    (
        "i forgot my password",
        "Update your account with a new password or contact the front desk.",
    ),
    ("what are your hours", "We are open Monday to Friday, 8:00 AM to 5:00 PM."),
    ("thank you", "You're welcome!"),
    ("thanks", "You're welcome!"),
    ("bye", "Goodbye! Have a great day."),
    ("goodbye", "Goodbye! Have a great day."),
];

/// Canonical lookup form: trimmed, inner whitespace collapsed, ASCII
/// lowercased, trailing `?`, `!` and `.` removed.
pub fn normalize(input: &str) -> String {
    let collapsed = input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase();
    collapsed
        .trim_end_matches(['?', '!', '.'])
        .trim_end()
        .to_owned()
}

#[derive(Debug, Clone)]
pub struct ChatBot {
    replies: HashMap<String, String>,
    fallback: String,
}

impl Default for ChatBot {
    fn default() -> Self {
        Self::new(&ChatConfig::default())
    }
}

impl ChatBot {
    /// Built-in table with configured entries layered on top.
    pub fn new(config: &ChatConfig) -> Self {
        let mut replies: HashMap<String, String> = DEFAULT_REPLIES
            .iter()
            .map(|(q, a)| (normalize(q), (*a).to_owned()))
            .collect();
        for (question, answer) in &config.replies {
            replies.insert(normalize(question), answer.clone());
        }

        let fallback = config
            .fallback
            .clone()
            .unwrap_or_else(|| DEFAULT_FALLBACK.to_owned());

        Self { replies, fallback }
    }

    pub fn reply(&self, message: &str) -> &str {
        self.replies
            .get(&normalize(message))
            .map_or(self.fallback.as_str(), String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_case_space_and_punctuation() {
        assert_eq!(normalize("  What   are your HOURS?! "), "what are your hours");
        assert_eq!(normalize("bye..."), "bye");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn known_phrase_in_any_form() {
        let bot = ChatBot::default();
        assert_eq!(bot.reply("THANK   you!"), "You're welcome!");
        assert_eq!(bot.reply("thank you"), bot.reply("  Thank You.  "));
    }

    #[test]
    fn unknown_phrase_gets_fallback() {
        let bot = ChatBot::default();
        assert_eq!(bot.reply("what is the meaning of life"), DEFAULT_FALLBACK);
        assert_eq!(bot.reply(""), DEFAULT_FALLBACK);
    }

    #[test]
    fn configured_replies_override_and_extend() {
        let mut config = ChatConfig {
            fallback: Some("Call us.".into()),
            ..Default::default()
        };
        config.replies.insert("Thanks!".into(), "Anytime.".into());
        config.replies.insert("Do you take walk-ins?".into(), "Until 3 PM.".into());

        let bot = ChatBot::new(&config);
        assert_eq!(bot.reply("thanks"), "Anytime.");
        assert_eq!(bot.reply("do you take walk-ins"), "Until 3 PM.");
        assert_eq!(bot.reply("hello"), "Hello! How can I help you with your appointment today?");
        assert_eq!(bot.reply("???"), "Call us.");
    }
}
