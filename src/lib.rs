//! mattertime: keep `updated` and `created` timestamps in markdown front matter
//!
//! The heart of the crate is [`upsert_key`]: a line-oriented rewrite that sets
//! one `key: value` entry in a document's front matter and leaves every other
//! byte untouched. Around it, [`Stamper`] decides when a note's timestamps are
//! due, [`Watcher`] turns file modifications into debounced updates, and the
//! `mattertime` binary exposes all of it on the command line.
//!
//! # Quick Start
//!
//! ## Upserting a key
//!
//! ```rust
//! use mattertime::upsert_key;
//!
//! let note = "---\ntitle: Notes\n---\n# Hello\n";
//! let updated = upsert_key(note, "updated", "2024-05-01T10:30");
//! assert_eq!(updated, "---\ntitle: Notes\nupdated: 2024-05-01T10:30\n---\n# Hello\n");
//! ```
//!
//! ## Stamping a vault
//!
//! ```rust,no_run
//! use mattertime::{Result, Settings, Stamper};
//! use std::sync::atomic::AtomicBool;
//!
//! fn main() -> Result<()> {
//!     let settings = Settings::load("settings.json")?;
//!     let stamper = Stamper::new(settings)?;
//!     let report = stamper.update_all("vault".as_ref(), &AtomicBool::new(false))?;
//!     println!("{} of {} notes changed", report.changed, report.total);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`crate::core`]: block detection, the upsert, read-only YAML access, dates
//! - [`config`]: settings file
//! - [`stamp`]: when and what to write
//! - [`watch`]: event source, debouncer, hash cache
//! - [`io`]: file enumeration and atomic writes
//! - [`error`]: error types

// Public API exports
pub use crate::error::{MatterTimeError, Result};

// Core types
pub use crate::core::{
    upsert_key, validate_entry, DateFormat, EntryLine, FrontMatter, FrontMatterBlock,
};

// Controller types
pub use config::{IgnoreFolders, Settings};
pub use io::FileTimes;
pub use stamp::{
    BulkReport, FileChangeStatus, IgnoreReason, KeyChange, StampPlan, StampedFile, Stamper,
    TriggerSource,
};
pub use watch::{ContentHashCache, Debouncer, VaultScanner, WatchConfig, Watcher};

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod stamp;
pub mod watch;

// CLI components are available only in the binary, not as part of the library API
