//! Last-resort scrape of a bot reply from an object's text form.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static VALUE_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"'value':\s*'([^']*)'").expect("invalid value field regex")
});

/// Pull the single-quoted `'value': '...'` content out of a stringified
/// message, or return the whole string when there is none.
pub fn extract_bot_reply<T>(msg: &T) -> String
where
    T: fmt::Display + ?Sized,
{
    let text = msg.to_string();
    match VALUE_FIELD_RE.captures(&text).and_then(|c| c.get(1)) {
        Some(value) => value.as_str().to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_quoted_value() {
        let msg = "{'type': 'text', 'text': {'value': 'Blue is calming.', 'annotations': []}}";
        assert_eq!(extract_bot_reply(msg), "Blue is calming.");
    }

    #[test]
    fn test_first_value_wins() {
        let msg = "'value': 'one' 'value':'two'";
        assert_eq!(extract_bot_reply(msg), "one");
    }

    #[test]
    fn test_without_value_returns_input() {
        assert_eq!(extract_bot_reply("plain reply"), "plain reply");
        assert_eq!(extract_bot_reply(&42), "42");
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(extract_bot_reply("{'value': ''}"), "");
    }
}
