//! Timestamp controller
//!
//! [`Stamper`] decides whether a note needs its `created` and `updated` keys
//! written, computes the new text with [`upsert_key`], and writes it back.
//! [`Stamper::plan`] is pure; [`Stamper::handle_file_change`] adds the file
//! system around it.

use crate::config::Settings;
use crate::core::{display_value, upsert_key, DateFormat, FrontMatter, FrontMatterBlock};
use crate::error::Result;
use crate::io::{read_to_string, resolve_files, vault_path, write_atomic, FileTimes};
use chrono::{Duration, NaiveDateTime};
use log::{debug, error, info, warn};
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Suffix of drawing files that keep their own data in the markdown body
pub const DRAWING_SUFFIX: &str = ".excalidraw.md";

/// Front matter key that drawing plugins put in their files
pub const DRAWING_KEY: &str = "excalidraw-plugin";

/// What caused a file to be looked at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    /// A modification event for this file
    Modify,
    /// A bulk update over the whole vault
    Bulk,
}

impl fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Modify => write!(f, "modify"),
            Self::Bulk => write!(f, "bulk"),
        }
    }
}

/// Why a file was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotMarkdown,
    Drawing,
    ExcludedFolder,
}

/// One key written by a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChange {
    pub key: String,
    pub old: Option<String>,
    pub new: String,
}

impl fmt::Display for KeyChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.old {
            Some(old) => write!(f, "{}: {} -> {}", self.key, old, self.new),
            None => write!(f, "{}: (none) -> {}", self.key, self.new),
        }
    }
}

/// Outcome of planning a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StampPlan {
    Ignored(IgnoreReason),
    Unchanged,
    Changed {
        changes: Vec<KeyChange>,
        content: String,
    },
}

/// Outcome of handling one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChangeStatus {
    Ok { changes: Vec<KeyChange> },
    Ignored(IgnoreReason),
    Error(String),
}

/// A handled file together with the text it holds as far as the stamper knows
///
/// `content` is what was written, or what was read when nothing was written.
/// It is `None` when the file was skipped before being read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampedFile {
    pub status: FileChangeStatus,
    pub content: Option<String>,
}

/// Tally of a bulk update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    pub total: usize,
    pub processed: usize,
    pub changed: usize,
    pub ignored: usize,
    pub errors: Vec<(String, String)>,
    pub cancelled: bool,
}

/// Decides and applies timestamp updates
#[derive(Debug, Clone)]
pub struct Stamper {
    settings: Settings,
    date_format: DateFormat,
    ignore_folders: Vec<String>,
    dry_run: bool,
}

impl Stamper {
    /// Build a stamper from validated settings
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let date_format = settings.date_format()?;
        let ignore_folders = settings.ignore_folders();
        Ok(Self {
            settings,
            date_format,
            ignore_folders,
            dry_run: false,
        })
    }

    /// Plan and report changes without writing files
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Path-level ignore rules; `path` is relative to the vault root
    pub fn ignore_reason(&self, path: &str) -> Option<IgnoreReason> {
        if !path.ends_with(".md") {
            return Some(IgnoreReason::NotMarkdown);
        }
        if path.ends_with(DRAWING_SUFFIX) {
            return Some(IgnoreReason::Drawing);
        }
        if self
            .ignore_folders
            .iter()
            .any(|folder| path.starts_with(folder.as_str()))
        {
            return Some(IgnoreReason::ExcludedFolder);
        }
        None
    }

    /// Whether `path` (relative to the vault root) is skipped entirely
    pub fn should_file_be_ignored(&self, path: &str) -> bool {
        self.ignore_reason(path).is_some()
    }

    /// Whether `path` (relative to the vault root) never gets a created key
    pub fn should_ignore_created(&self, path: &str) -> bool {
        if !self.settings.enable_create_time {
            return true;
        }
        self.settings
            .ignore_created_folder
            .iter()
            .filter(|folder| !folder.trim().is_empty())
            .any(|folder| path.starts_with(folder.as_str()))
    }

    /// Whether `modified` is past `current` plus the minimum interval
    pub fn should_update_value(&self, modified: NaiveDateTime, current: NaiveDateTime) -> bool {
        let next_update =
            current + Duration::minutes(i64::from(self.settings.min_minutes_between_saves));
        modified > next_update
    }

    /// Work out the new text for a note, without touching the file system
    pub fn plan(&self, path: &str, content: &str, times: &FileTimes) -> Result<StampPlan> {
        if let Some(reason) = self.ignore_reason(path) {
            return Ok(StampPlan::Ignored(reason));
        }

        let front_matter = FrontMatter::parse(content)?.unwrap_or_default();
        if front_matter.contains_key(DRAWING_KEY) {
            return Ok(StampPlan::Ignored(IgnoreReason::Drawing));
        }

        let mut changes = Vec::new();

        let created_key = &self.settings.header_created;
        if front_matter.is_blank(created_key) && !self.should_ignore_created(path) {
            changes.push(KeyChange {
                key: created_key.clone(),
                old: front_matter.get(created_key).map(display_value),
                new: self.date_format.format(&times.created),
            });
        }

        let updated_key = &self.settings.header_updated;
        let current = front_matter.get(updated_key);
        let modified = times.modified.naive_local();
        let refresh = match current.and_then(|value| self.date_format.parse_value(value)) {
            None => {
                debug!("{}: no usable {} value", path, updated_key);
                true
            }
            Some(parsed) => self.should_update_value(modified, parsed),
        };
        if refresh {
            let new = self.date_format.format(&times.modified);
            let old = current.map(display_value);
            if old.as_deref() != Some(new.as_str()) {
                changes.push(KeyChange {
                    key: updated_key.clone(),
                    old,
                    new,
                });
            }
        } else {
            debug!("{}: skipping {}", path, updated_key);
        }

        // A key YAML knows about but that sits on no `key: value` line (`key:`
        // alone, a quoted key, a multi-line value) cannot be rewritten in place.
        let block = FrontMatterBlock::locate(content);
        changes.retain(|change| {
            let writable = !front_matter.contains_key(&change.key)
                || block.is_some_and(|block| block.has_key_line(&change.key));
            if !writable {
                warn!("{}: {} is not a single-line entry, leaving it alone", path, change.key);
            }
            writable
        });

        if changes.is_empty() {
            return Ok(StampPlan::Unchanged);
        }

        let content = changes.iter().fold(content.to_string(), |text, change| {
            upsert_key(&text, &change.key, &change.new)
        });
        Ok(StampPlan::Changed { changes, content })
    }

    /// Read, plan and write one file
    ///
    /// `root` is the vault root that ignore rules are relative to. Failures are
    /// reported in the returned status, never raised.
    pub fn handle_file_change(
        &self,
        root: &Path,
        path: &Path,
        trigger: TriggerSource,
    ) -> FileChangeStatus {
        match self.stamp_file(root, path, trigger) {
            Ok(stamped) => stamped.status,
            Err(e) => {
                warn!("failed to update {}: {}", vault_path(root, path), e);
                FileChangeStatus::Error(e.to_string())
            }
        }
    }

    /// Like [`Stamper::handle_file_change`], but errors are returned and the
    /// text the stamper read or wrote comes back with the status
    pub fn stamp_file(
        &self,
        root: &Path,
        path: &Path,
        trigger: TriggerSource,
    ) -> Result<StampedFile> {
        let relative = vault_path(root, path);
        debug!("{} event for {}", trigger, relative);

        if let Some(reason) = self.ignore_reason(&relative) {
            return Ok(StampedFile {
                status: FileChangeStatus::Ignored(reason),
                content: None,
            });
        }

        let content = read_to_string(path)?;
        let times = FileTimes::of(path)?;

        let (status, content) = match self.plan(&relative, &content, &times)? {
            StampPlan::Ignored(reason) => (FileChangeStatus::Ignored(reason), content),
            StampPlan::Unchanged => (
                FileChangeStatus::Ok {
                    changes: Vec::new(),
                },
                content,
            ),
            StampPlan::Changed {
                changes,
                content: stamped,
            } => {
                for change in &changes {
                    info!("{}: {}", relative, change);
                }
                if self.dry_run {
                    debug!("dry run, not writing {}", relative);
                    (FileChangeStatus::Ok { changes }, content)
                } else {
                    write_atomic(path, &stamped)?;
                    (FileChangeStatus::Ok { changes }, stamped)
                }
            }
        };

        Ok(StampedFile {
            status,
            content: Some(content),
        })
    }

    /// Stamp every eligible note under `root`
    ///
    /// Per-file failures are collected in the report. An error that is not
    /// recoverable (e.g. permission denied) stops the run and is returned.
    /// Setting `cancel` stops the run before the next file.
    pub fn update_all(&self, root: &Path, cancel: &AtomicBool) -> Result<BulkReport> {
        let files: Vec<_> = resolve_files(&[root.to_path_buf()])?
            .into_iter()
            .filter(|file| !self.should_file_be_ignored(&vault_path(root, file)))
            .collect();

        let mut report = BulkReport {
            total: files.len(),
            ..Default::default()
        };
        info!("updating {} files under {}", files.len(), root.display());

        for (index, file) in files.iter().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                warn!("bulk update stopped after {}/{}", index, files.len());
                report.cancelled = true;
                break;
            }
            debug!("{}/{} {}", index + 1, files.len(), file.display());

            let relative = vault_path(root, file);
            match self.stamp_file(root, file, TriggerSource::Bulk) {
                Ok(StampedFile { status, .. }) => match status {
                    FileChangeStatus::Ok { changes } => {
                        if !changes.is_empty() {
                            report.changed += 1;
                        }
                    }
                    FileChangeStatus::Ignored(_) => report.ignored += 1,
                    FileChangeStatus::Error(message) => report.errors.push((relative, message)),
                },
                Err(e) if e.is_recoverable() => {
                    warn!("failed to update {}: {}", relative, e);
                    report.errors.push((relative, e.to_string()));
                }
                Err(e) => {
                    error!(
                        "bulk update aborted at {}/{} ({}): {}",
                        index + 1,
                        files.len(),
                        relative,
                        e
                    );
                    return Err(e);
                }
            }
            report.processed += 1;
        }

        Ok(report)
    }
}
