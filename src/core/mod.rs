//! Core front matter handling
//!
//! - block: locating the leading `---` block
//! - upsert: non-destructive single-key rewrite of raw text
//! - front_matter: read-only YAML view of the block
//! - date: timestamp formatting and parsing

pub mod block;
pub mod date;
pub mod front_matter;
pub mod upsert;

pub use block::{EntryLine, FrontMatterBlock};
pub use date::{DateFormat, DEFAULT_DATE_FORMAT};
pub use front_matter::{display_value, FrontMatter};
pub use upsert::{upsert_key, validate_entry};
