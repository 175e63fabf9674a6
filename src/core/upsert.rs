//! Non-destructive key upsert on raw document text
//!
//! [`upsert_key`] rewrites a single `key: value` line of the leading front
//! matter block and leaves every other byte of the document alone. It never
//! parses YAML: entry lines are opaque strings, and only lines of the shape
//! `key: value` are candidates for replacement.

use crate::core::block::{EntryLine, FrontMatterBlock, DELIMITER, KEY_SEPARATOR};
use crate::error::{MatterTimeError, Result};
use std::borrow::Cow;

/// Insert or update `key` in the front matter of `document`
///
/// - Without a leading front matter block, a new block holding only
///   `key: value` is prepended to the unchanged document.
/// - With one, the first line whose key is exactly `key` gets its value
///   replaced in place. Otherwise `key: value` becomes the last line of the
///   block. The closing delimiter and the body are copied through as is.
///
/// `key` must not contain `": "` or a line break and `value` must not contain
/// a line break. Use [`validate_entry`] when the inputs come from a user.
///
/// ```
/// use mattertime::upsert_key;
///
/// assert_eq!(upsert_key("# Hello", "k", "v"), "---\nk: v\n---\n# Hello");
/// assert_eq!(
///     upsert_key("---\nk: old\n---\n# Hello", "k", "new"),
///     "---\nk: new\n---\n# Hello"
/// );
/// ```
pub fn upsert_key(document: &str, key: &str, value: &str) -> String {
    let Some(block) = FrontMatterBlock::locate(document) else {
        return synthesize(document, key, value);
    };

    // Splitting the inner text on '\n' yields the remainder of the opening
    // line first and an empty placeholder last (the closing delimiter's line).
    let mut lines: Vec<Cow<'_, str>> = block.inner().split('\n').map(Cow::Borrowed).collect();

    let existing = lines
        .iter()
        .position(|line| EntryLine::parse(line).key() == Some(key));

    match existing {
        Some(index) => {
            let carriage_return = if lines[index].ends_with('\r') { "\r" } else { "" };
            lines[index] = Cow::Owned(format!("{key}{KEY_SEPARATOR}{value}{carriage_return}"));
        }
        None => {
            let carriage_return = if block.uses_crlf() { "\r" } else { "" };
            lines.pop();
            lines.push(Cow::Owned(format!("{key}{KEY_SEPARATOR}{value}{carriage_return}")));
            lines.push(Cow::Borrowed(""));
        }
    }

    let mut output = String::with_capacity(document.len() + key.len() + value.len() + 4);
    output.push_str(block.opening());
    output.push_str(&lines.join("\n"));
    output.push_str(block.rest());
    output
}

/// Check that `key` and `value` can be written as a single entry line
pub fn validate_entry(key: &str, value: &str) -> Result<()> {
    if key.is_empty() {
        return Err(MatterTimeError::invalid_key(key, "key is empty"));
    }
    if key.contains(KEY_SEPARATOR) {
        return Err(MatterTimeError::invalid_key(
            key,
            format!("key contains the separator {KEY_SEPARATOR:?}"),
        ));
    }
    if key.contains(['\n', '\r']) {
        return Err(MatterTimeError::invalid_key(key, "key contains a line break"));
    }
    if key.trim() == DELIMITER {
        return Err(MatterTimeError::invalid_key(key, "key is a block delimiter"));
    }
    if value.contains(['\n', '\r']) {
        return Err(MatterTimeError::invalid_value(
            value,
            "multi-line values are not supported",
        ));
    }
    Ok(())
}

fn synthesize(document: &str, key: &str, value: &str) -> String {
    format!("{DELIMITER}\n{key}{KEY_SEPARATOR}{value}\n{DELIMITER}\n{document}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_replaces_in_place() {
        let content = "---\nsome: parameter\ntoto: oldValue\n---\n\n# Hello\n ";
        let result = upsert_key(content, "toto", "tata");
        assert_eq!(result, "---\nsome: parameter\ntoto: tata\n---\n\n# Hello\n ");
    }

    #[test]
    fn test_appends_missing_key() {
        let result = upsert_key("---\nold: data\n---\n\n# Hello\n", "some", "value");
        assert_eq!(result, "---\nold: data\nsome: value\n---\n\n# Hello\n");
    }

    #[test]
    fn test_empty_block_gets_entry() {
        assert_eq!(upsert_key("---\n---\n", "k", "v"), "---\nk: v\n---\n");
        assert_eq!(upsert_key("---\n---", "k", "v"), "---\nk: v\n---");
    }

    #[test]
    fn test_first_duplicate_wins() {
        let result = upsert_key("---\na: 1\na: 2\n---\n", "a", "3");
        assert_eq!(result, "---\na: 3\na: 2\n---\n");
    }

    #[test]
    fn test_value_with_separator_is_replaced_whole() {
        let result = upsert_key("---\ntitle: a: b\n---\n", "title", "c");
        assert_eq!(result, "---\ntitle: c\n---\n");
    }

    #[test]
    fn test_key_without_value_is_not_a_match() {
        // `key:` with nothing after it opens a nested mapping
        let result = upsert_key("---\nmeta:\n  a: 1\n---\n", "meta", "x");
        assert_eq!(result, "---\nmeta:\n  a: 1\nmeta: x\n---\n");
    }

    #[test]
    fn test_crlf_preserved() {
        let content = "---\r\nupdated: old\r\n---\r\nbody\r\n";
        assert_eq!(
            upsert_key(content, "updated", "new"),
            "---\r\nupdated: new\r\n---\r\nbody\r\n"
        );
        assert_eq!(
            upsert_key(content, "created", "now"),
            "---\r\nupdated: old\r\ncreated: now\r\n---\r\nbody\r\n"
        );
    }

    #[test]
    fn test_unclosed_block_is_wrapped() {
        let result = upsert_key("---\na: 1\n", "k", "v");
        assert_eq!(result, "---\nk: v\n---\n---\na: 1\n");
    }

    #[test]
    fn test_whitespace_only_document() {
        assert_eq!(upsert_key("  \n", "k", "v"), "---\nk: v\n---\n  \n");
    }

    #[test]
    fn test_repeated_calls_are_stable() {
        let once = upsert_key("# Title\n", "updated", "2024-01-01T10:00");
        let twice = upsert_key(&once, "updated", "2024-01-01T10:00");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_validate_entry() {
        assert!(validate_entry("updated", "2024-01-01T10:00").is_ok());
        assert!(validate_entry("updated", "").is_ok());
        assert!(matches!(
            validate_entry("", "v"),
            Err(MatterTimeError::InvalidKey { .. })
        ));
        assert!(matches!(
            validate_entry("a: b", "v"),
            Err(MatterTimeError::InvalidKey { .. })
        ));
        assert!(matches!(
            validate_entry("a\nb", "v"),
            Err(MatterTimeError::InvalidKey { .. })
        ));
        assert!(matches!(
            validate_entry("---", "v"),
            Err(MatterTimeError::InvalidKey { .. })
        ));
        assert!(matches!(
            validate_entry("k", "line\nbreak"),
            Err(MatterTimeError::InvalidValue { .. })
        ));
    }
}
