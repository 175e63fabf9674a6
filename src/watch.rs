//! Watch mode: modification events -> per-path debounce -> stamp worker
//!
//! Events come from a polling scan of the vault. Each changed path is
//! coalesced by a [`Debouncer`] until it has been quiet for the window, then
//! handed to the [`Stamper`]. A [`ContentHashCache`] remembers the text the
//! worker last read or wrote for every file. The worker's own write shows up
//! as one more modification on the next scan and is skipped by that hash,
//! while any other edit hashes differently and gets stamped.

use crate::error::Result;
use crate::io::{is_markdown, read_to_string, resolve_files};
use crate::stamp::{FileChangeStatus, StampedFile, Stamper, TriggerSource};
use log::{debug, info, warn};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

/// Quiet period a path needs before it is processed
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(30);

/// Delay between two scans of the vault
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Timing of the watch loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchConfig {
    pub debounce: Duration,
    pub poll_interval: Duration,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Per-path coalescing of change events
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    pending: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: HashMap::new(),
        }
    }

    /// Record an event for `path`, restarting its quiet period
    pub fn touch(&mut self, path: PathBuf, now: Instant) {
        self.pending.insert(path, now);
    }

    /// Remove and return every path that has been quiet for the window
    pub fn drain_ready(&mut self, now: Instant) -> Vec<PathBuf> {
        let mut ready: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, last)| now.saturating_duration_since(**last) >= self.window)
            .map(|(path, _)| path.clone())
            .collect();
        ready.sort();
        for path in &ready {
            self.pending.remove(path);
        }
        ready
    }

    pub fn is_pending(&self, path: &Path) -> bool {
        self.pending.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// SHA-256 of note contents, keyed by path
#[derive(Debug, Clone, Default)]
pub struct ContentHashCache {
    hashes: HashMap<PathBuf, String>,
}

impl ContentHashCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hex digest of `content`
    pub fn digest(content: &str) -> String {
        format!("{:x}", Sha256::digest(content.as_bytes()))
    }

    /// Whether `content` is what was last recorded for `path`
    pub fn is_unchanged(&self, path: &Path, content: &str) -> bool {
        self.hashes
            .get(path)
            .is_some_and(|hash| *hash == Self::digest(content))
    }

    pub fn record(&mut self, path: PathBuf, content: &str) {
        self.hashes.insert(path, Self::digest(content));
    }

    pub fn forget(&mut self, path: &Path) {
        self.hashes.remove(path);
    }

    /// Drop every entry whose path `keep` rejects
    pub fn retain(&mut self, mut keep: impl FnMut(&Path) -> bool) {
        self.hashes.retain(|path, _| keep(path));
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// Polling event source: reports markdown files whose mtime moved
#[derive(Debug)]
pub struct VaultScanner {
    root: PathBuf,
    seen: HashMap<PathBuf, SystemTime>,
}

impl VaultScanner {
    /// Snapshot the vault; files present now do not count as changed
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let mut scanner = Self {
            root: root.into(),
            seen: HashMap::new(),
        };
        scanner.scan()?;
        Ok(scanner)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths that are new or whose modification time changed since last scan
    pub fn scan(&mut self) -> Result<Vec<PathBuf>> {
        let mut current = HashMap::new();
        let mut changed = Vec::new();

        for path in resolve_files(&[self.root.clone()])? {
            let Some(modified) = modified_time(&path) else {
                continue;
            };
            if self.seen.get(&path) != Some(&modified) {
                changed.push(path.clone());
            }
            current.insert(path, modified);
        }

        self.seen = current;
        Ok(changed)
    }

    /// Whether the last scan found `path`
    pub fn contains(&self, path: &Path) -> bool {
        self.seen.contains_key(path)
    }
}

/// The watch loop
pub struct Watcher {
    stamper: Stamper,
    scanner: VaultScanner,
    debouncer: Debouncer,
    cache: ContentHashCache,
    config: WatchConfig,
}

impl Watcher {
    pub fn new(root: impl Into<PathBuf>, stamper: Stamper, config: WatchConfig) -> Result<Self> {
        Ok(Self {
            stamper,
            scanner: VaultScanner::new(root)?,
            debouncer: Debouncer::new(config.debounce),
            cache: ContentHashCache::new(),
            config,
        })
    }

    /// One scan, then process every path whose quiet period is over
    pub fn tick(&mut self, now: Instant) -> Result<Vec<(PathBuf, FileChangeStatus)>> {
        for path in self.scanner.scan()? {
            debug!("modified: {}", path.display());
            self.debouncer.touch(path, now);
        }
        self.cache.retain(|path| self.scanner.contains(path));

        let mut results = Vec::new();
        for path in self.debouncer.drain_ready(now) {
            if let Some(status) = self.process(&path) {
                results.push((path, status));
            }
        }
        Ok(results)
    }

    fn process(&mut self, path: &Path) -> Option<FileChangeStatus> {
        if !is_markdown(path) {
            return None;
        }
        let content = match read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!("{} vanished before processing: {}", path.display(), e);
                self.cache.forget(path);
                return None;
            }
        };
        if self.cache.is_unchanged(path, &content) {
            debug!("{} unchanged since last update, skipping", path.display());
            return None;
        }

        let status = match self
            .stamper
            .stamp_file(self.scanner.root(), path, TriggerSource::Modify)
        {
            Ok(StampedFile { status, content }) => {
                match content {
                    Some(content) => self.cache.record(path.to_path_buf(), &content),
                    None => self.cache.forget(path),
                }
                status
            }
            Err(e) => {
                warn!("failed to update {}: {}", path.display(), e);
                self.cache.forget(path);
                FileChangeStatus::Error(e.to_string())
            }
        };
        Some(status)
    }

    /// Loop until `stop` is set
    pub fn run(&mut self, stop: &AtomicBool) -> Result<()> {
        info!(
            "watching {} (debounce {:?}, poll {:?})",
            self.scanner.root().display(),
            self.config.debounce,
            self.config.poll_interval
        );
        while !stop.load(Ordering::Relaxed) {
            for (path, status) in self.tick(Instant::now())? {
                match status {
                    FileChangeStatus::Ok { changes } if !changes.is_empty() => {
                        info!("stamped {}", path.display());
                    }
                    FileChangeStatus::Error(message) => {
                        warn!("{}: {}", path.display(), message);
                    }
                    _ => {}
                }
            }
            thread::sleep(self.config.poll_interval);
        }
        info!("watch stopped");
        Ok(())
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
