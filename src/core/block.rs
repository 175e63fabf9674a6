//! Front matter block detection
//!
//! A block exists only when the very first line of a document is exactly `---`
//! and a later line is exactly `---`. Detection is a plain line scan: the block
//! closes at the first such line, and `---` lines further down belong to the
//! body.

/// Line that opens and closes a front matter block
pub const DELIMITER: &str = "---";

/// Separator between a key and its value on an entry line
pub const KEY_SEPARATOR: &str = ": ";

/// A front matter block located inside a document, borrowed from it
///
/// The three parts concatenate back to the original document:
/// `opening + inner + rest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontMatterBlock<'a> {
    opening: &'a str,
    inner: &'a str,
    rest: &'a str,
}

/// One line of the front matter block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryLine<'a> {
    /// `key: value`, split on the first separator
    Pair { key: &'a str, value: &'a str },
    /// Anything else: nested YAML, list items, blank lines, comments
    Opaque(&'a str),
}

impl<'a> FrontMatterBlock<'a> {
    /// Find the leading front matter block of `content`, if there is one
    pub fn locate(content: &'a str) -> Option<Self> {
        let mut lines = content.split_inclusive('\n');

        let first = lines.next()?;
        if strip_line_ending(first) != DELIMITER {
            return None;
        }

        let mut offset = first.len();
        for line in lines {
            if strip_line_ending(line) == DELIMITER {
                return Some(Self {
                    opening: &content[..DELIMITER.len()],
                    inner: &content[DELIMITER.len()..offset],
                    rest: &content[offset..],
                });
            }
            offset += line.len();
        }

        None
    }

    /// The opening delimiter, without its line break
    pub fn opening(&self) -> &'a str {
        self.opening
    }

    /// Raw text between the delimiters
    ///
    /// Starts with the opening delimiter's line break and ends with the line
    /// break that precedes the closing delimiter.
    pub fn inner(&self) -> &'a str {
        self.inner
    }

    /// The closing delimiter and everything after it
    pub fn rest(&self) -> &'a str {
        self.rest
    }

    /// Whether the block uses CRLF line breaks
    pub fn uses_crlf(&self) -> bool {
        self.inner.starts_with("\r\n")
    }

    /// Lines of the block's YAML content, opening line break excluded
    pub fn entry_lines(&self) -> impl Iterator<Item = EntryLine<'a>> {
        let inner = self.inner;
        inner.lines().skip(1).map(EntryLine::parse)
    }

    /// Whether some `key: value` line carries exactly `key`
    pub fn has_key_line(&self, key: &str) -> bool {
        self.entry_lines().any(|line| line.key() == Some(key))
    }
}

impl<'a> EntryLine<'a> {
    /// Classify a single line (without its line break)
    pub fn parse(line: &'a str) -> Self {
        match line.split_once(KEY_SEPARATOR) {
            Some((key, value)) => Self::Pair { key, value },
            None => Self::Opaque(line),
        }
    }

    /// The key of a `key: value` line
    pub fn key(&self) -> Option<&'a str> {
        match self {
            Self::Pair { key, .. } => Some(key),
            Self::Opaque(_) => None,
        }
    }
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
